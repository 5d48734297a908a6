//! Phase simulator: steps a principal / contribution pair through a span of time

use serde::{Deserialize, Serialize};

use crate::finance::{annuity_value, compound_value, AnnuityTiming};

/// Remaining durations within this many years of zero count as finished
const DURATION_EPSILON: f64 = 1e-9;

/// Values at a point in a phase, restated cumulatively from the phase start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Years since the phase started
    pub elapsed_years: f64,

    /// Future value of the starting principal
    pub principal_value: f64,

    /// Future value of the contributions made during the phase
    pub contributions_value: f64,
}

impl Snapshot {
    pub fn balance(&self) -> f64 {
        self.principal_value + self.contributions_value
    }
}

/// Inputs for one contiguous phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseInputs {
    pub start_principal: f64,
    pub contribution: f64,
    pub annual_rate: f64,
    pub principal_periods: u32,
    pub contribution_periods: u32,
    pub timing: AnnuityTiming,
    pub duration_years: f64,
    pub step_years: f64,
}

/// Lazy sequence of snapshots for one phase
///
/// Advances in steps of `min(step_years, remaining)` and yields one snapshot
/// per step. A phase with no duration yields exactly one snapshot at time zero,
/// so the sequence is never empty. A non-positive step is taken as one step
/// covering the whole phase.
#[derive(Debug, Clone)]
pub struct PhaseSimulator {
    inputs: PhaseInputs,
    elapsed: f64,
    remaining: f64,
    emitted: bool,
}

impl PhaseSimulator {
    pub fn new(inputs: PhaseInputs) -> Self {
        Self {
            inputs,
            elapsed: 0.0,
            remaining: inputs.duration_years.max(0.0),
            emitted: false,
        }
    }

    pub fn inputs(&self) -> &PhaseInputs {
        &self.inputs
    }

    fn snapshot_at(&self, elapsed_years: f64) -> Snapshot {
        let inputs = &self.inputs;
        Snapshot {
            elapsed_years,
            principal_value: compound_value(
                inputs.start_principal,
                inputs.annual_rate,
                elapsed_years,
                inputs.principal_periods,
            ),
            contributions_value: annuity_value(
                inputs.contribution,
                inputs.annual_rate,
                elapsed_years,
                inputs.contribution_periods,
                inputs.timing,
            ),
        }
    }
}

impl Iterator for PhaseSimulator {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        if self.remaining > DURATION_EPSILON {
            let step = if self.inputs.step_years > 0.0 {
                self.inputs.step_years.min(self.remaining)
            } else {
                self.remaining
            };
            self.remaining -= step;
            self.elapsed = if self.remaining > DURATION_EPSILON {
                self.elapsed + step
            } else {
                // Land exactly on the phase end
                self.inputs.duration_years
            };
            self.emitted = true;
            return Some(self.snapshot_at(self.elapsed));
        }

        if !self.emitted {
            self.emitted = true;
            return Some(self.snapshot_at(0.0));
        }

        None
    }
}

/// Start a fresh phase simulation
pub fn simulate_phase(inputs: PhaseInputs) -> PhaseSimulator {
    PhaseSimulator::new(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(duration_years: f64) -> PhaseInputs {
        PhaseInputs {
            start_principal: 10_000.0,
            contribution: 100.0,
            annual_rate: 0.09,
            principal_periods: 1,
            contribution_periods: 12,
            timing: AnnuityTiming::Ordinary,
            duration_years,
            step_years: 1.0,
        }
    }

    #[test]
    fn test_yearly_steps_with_fractional_tail() {
        let snapshots: Vec<_> = simulate_phase(inputs(2.5)).collect();
        let elapsed: Vec<_> = snapshots.iter().map(|s| s.elapsed_years).collect();
        assert_eq!(elapsed, vec![1.0, 2.0, 2.5]);
    }

    #[test]
    fn test_snapshots_are_cumulative() {
        let last = simulate_phase(inputs(3.0)).last().unwrap();
        assert_relative_eq!(
            last.principal_value,
            compound_value(10_000.0, 0.09, 3.0, 1),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            last.contributions_value,
            annuity_value(100.0, 0.09, 3.0, 12, AnnuityTiming::Ordinary),
            max_relative = 1e-12
        );
        assert_relative_eq!(last.balance(), last.principal_value + last.contributions_value);
    }

    #[test]
    fn test_zero_duration_yields_starting_principal() {
        let snapshots: Vec<_> = simulate_phase(inputs(0.0)).collect();
        assert_eq!(
            snapshots,
            vec![Snapshot {
                elapsed_years: 0.0,
                principal_value: 10_000.0,
                contributions_value: 0.0,
            }]
        );

        let negative: Vec<_> = simulate_phase(inputs(-2.0)).collect();
        assert_eq!(negative.len(), 1);
        assert_eq!(negative[0].balance(), 10_000.0);
    }

    #[test]
    fn test_restart_gives_same_sequence() {
        let phase = inputs(4.0);
        let first: Vec<_> = simulate_phase(phase).collect();
        let second: Vec<_> = simulate_phase(phase).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_sub_year_step() {
        let phase = PhaseInputs {
            step_years: 0.25,
            ..inputs(1.0)
        };
        let snapshots: Vec<_> = simulate_phase(phase).collect();
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots[3].elapsed_years, 1.0);
    }

    #[test]
    fn test_non_positive_step_covers_whole_phase() {
        let phase = PhaseInputs {
            step_years: 0.0,
            ..inputs(6.0)
        };
        let snapshots: Vec<_> = simulate_phase(phase).collect();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].elapsed_years, 6.0);
    }
}
