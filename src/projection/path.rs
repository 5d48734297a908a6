//! Scenario paths: phases stitched together for one recession start year
//!
//! A path is a lazy sequence of trace rows. Each phase is seeded from the
//! final snapshot of the one before it, so evaluation (which only reads the
//! last row) and the yearly breakdown (which reads every row) walk the same path.

use serde::{Deserialize, Serialize};

use super::phase::{simulate_phase, PhaseInputs, PhaseSimulator, Snapshot};
use crate::strategy::Strategy;

/// Segment of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Whole horizon at the normal rate (no recession)
    Growth,
    PreRecession,
    /// Drawn-down balance growing at the derived recovery rate
    Recovery,
    PostRecession,
}

/// One snapshot of a scenario, tagged with where and at what rate it was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Year the recession starts; `None` when no recession is modelled
    pub recession_start_year: Option<u32>,
    pub phase: Phase,
    /// Years since the phase started
    pub elapsed_years: f64,
    pub principal_value: f64,
    pub contributions_value: f64,
    pub balance: f64,
    /// Annual rate in effect during the phase
    pub annual_rate: f64,
}

/// Lazy walk through the phases of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioPath<'a> {
    strategy: &'a Strategy,
    step_years: f64,
    recovery_rate: f64,
    recession_start_year: Option<u32>,
    phase: Phase,
    current: Option<PhaseSimulator>,
    /// Years covered by the phases started so far
    elapsed_years: f64,
    last: Option<Snapshot>,
}

impl<'a> ScenarioPath<'a> {
    /// Path with a recession at `recession_start_year`, or a plain growth path for `None`
    ///
    /// `recovery_rate` is only used when a recession is modelled.
    pub fn new(
        strategy: &'a Strategy,
        step_years: f64,
        recovery_rate: f64,
        recession_start_year: Option<u32>,
    ) -> Self {
        let (phase, duration) = match recession_start_year {
            None => (Phase::Growth, strategy.horizon_years),
            Some(year) => (
                Phase::PreRecession,
                strategy.horizon_years.min(f64::from(year)),
            ),
        };

        let mut path = Self {
            strategy,
            step_years,
            recovery_rate,
            recession_start_year,
            phase,
            current: None,
            elapsed_years: 0.0,
            last: None,
        };
        path.start_phase(phase, strategy.principal, strategy.rate, duration);
        path
    }

    pub fn recession_start_year(&self) -> Option<u32> {
        self.recession_start_year
    }

    /// Final balance of the scenario (consumes the path)
    pub fn final_balance(self) -> Option<f64> {
        self.last().map(|row| row.balance)
    }

    fn start_phase(&mut self, phase: Phase, start_principal: f64, annual_rate: f64, duration: f64) {
        let duration = duration.max(0.0);
        self.elapsed_years += duration;
        self.phase = phase;
        self.current = Some(simulate_phase(PhaseInputs {
            start_principal,
            contribution: self.strategy.contribution,
            annual_rate,
            principal_periods: self.strategy.compounding_per_year,
            contribution_periods: self.strategy.contributions_per_year,
            timing: self.strategy.annuity_timing,
            duration_years: duration,
            step_years: self.step_years,
        }));
    }

    /// Seed the phase after the current one from its final snapshot
    fn advance_phase(&mut self) {
        let strategy = self.strategy;
        let ending_balance = self
            .last
            .map(|snapshot| snapshot.balance())
            .unwrap_or(strategy.principal);
        let remaining = strategy.horizon_years - self.elapsed_years;

        match self.phase {
            Phase::PreRecession => {
                // Shock the whole balance, then inject the reserve; accrued contributions restart
                let start = ending_balance * strategy.drawdown_fraction + strategy.lump_sum;
                let duration = strategy.recovery_years.min(remaining);
                self.start_phase(Phase::Recovery, start, self.recovery_rate, duration);
            }
            Phase::Recovery => {
                self.start_phase(Phase::PostRecession, ending_balance, strategy.rate, remaining);
            }
            Phase::Growth | Phase::PostRecession => {
                self.current = None;
            }
        }
    }

    fn row(&self, snapshot: Snapshot, annual_rate: f64) -> TraceRow {
        TraceRow {
            recession_start_year: self.recession_start_year,
            phase: self.phase,
            elapsed_years: snapshot.elapsed_years,
            principal_value: snapshot.principal_value,
            contributions_value: snapshot.contributions_value,
            balance: snapshot.balance(),
            annual_rate,
        }
    }
}

impl Iterator for ScenarioPath<'_> {
    type Item = TraceRow;

    fn next(&mut self) -> Option<TraceRow> {
        loop {
            let simulator = self.current.as_mut()?;
            let annual_rate = simulator.inputs().annual_rate;
            if let Some(snapshot) = simulator.next() {
                self.last = Some(snapshot);
                return Some(self.row(snapshot, annual_rate));
            }
            self.advance_phase();
        }
    }
}
