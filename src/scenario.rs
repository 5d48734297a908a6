//! Scenario runner for batch strategy evaluation
//!
//! Generates every allocation for a run config, evaluates the resulting
//! strategies in parallel, and ranks them by best-case final balance.

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, StrategyError};
use crate::projection::{EngineConfig, ScenarioEngine, TraceRow};
use crate::strategy::{Allocation, RunConfig, Strategy};

/// A strategy whose evaluation failed; excluded from the ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedStrategy {
    pub allocation: Allocation,
    pub error: String,
}

/// An evaluated strategy together with the allocation it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStrategy {
    pub allocation: Allocation,
    pub strategy: Strategy,
}

impl RankedStrategy {
    pub fn worst(&self) -> f64 {
        self.strategy.min_final_balance().unwrap_or(f64::NAN)
    }

    pub fn best(&self) -> f64 {
        self.strategy.max_final_balance().unwrap_or(f64::NAN)
    }
}

/// Result of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct RankedRun {
    pub config: RunConfig,
    /// Successful strategies, best-case balance descending
    pub ranked: Vec<RankedStrategy>,
    pub failures: Vec<FailedStrategy>,
}

impl RankedRun {
    pub fn top(&self) -> Option<&RankedStrategy> {
        self.ranked.first()
    }
}

/// Batch runner over a run configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// for rate in [0.05, 0.09, 0.15] {
///     let mut config = RunConfig::default();
///     config.params.rate = rate;
///     let run = runner.run(&config)?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner;

impl ScenarioRunner {
    pub fn new() -> Self {
        Self
    }

    /// Generate, evaluate and rank every allocation of the config
    pub fn run(&self, config: &RunConfig) -> Result<RankedRun> {
        config.validate()?;
        let allocations = config.grid()?.generate(config.total_amount)?;
        let engine = ScenarioEngine::new(EngineConfig {
            step_years: config.step_years,
        });

        let outcomes: Vec<Outcome> = allocations
            .par_iter()
            .map(|allocation| {
                let outcome = Strategy::from_allocation(allocation, &config.params)
                    .and_then(|mut strategy| {
                        engine.evaluate_in_place(&mut strategy)?;
                        Ok(strategy)
                    });
                (*allocation, outcome)
            })
            .collect();

        let total = outcomes.len();
        let (ranked, failures) = rank_outcomes(outcomes);

        info!(
            "Ranked {} of {} allocations ({} failed)",
            ranked.len(),
            total,
            failures.len()
        );

        Ok(RankedRun {
            config: config.clone(),
            ranked,
            failures,
        })
    }

    /// Run several configurations, e.g. a rate sensitivity
    pub fn run_scenarios(&self, configs: &[RunConfig]) -> Result<Vec<RankedRun>> {
        configs.iter().map(|config| self.run(config)).collect()
    }

    /// Full trace for one strategy, optionally with the recession switched
    pub fn breakdown(
        &self,
        strategy: &Strategy,
        recession_enabled: bool,
        step_years: f64,
    ) -> Result<Vec<TraceRow>> {
        let strategy = strategy.with_recession(recession_enabled);
        let engine = ScenarioEngine::new(EngineConfig { step_years });
        let rows = engine.trace(&strategy)?.collect();
        Ok(rows)
    }
}

type Outcome = (Allocation, std::result::Result<Strategy, StrategyError>);

/// Split evaluated allocations into a ranking and a failure list
///
/// Outcomes arrive in allocation order, so the stable sort keeps ties in that order.
fn rank_outcomes(outcomes: Vec<Outcome>) -> (Vec<RankedStrategy>, Vec<FailedStrategy>) {
    let mut ranked = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (allocation, outcome) in outcomes {
        match outcome {
            Ok(strategy) => ranked.push(RankedStrategy { allocation, strategy }),
            Err(error) => {
                warn!("Excluding allocation {:?} from ranking: {}", allocation, error);
                failures.push(FailedStrategy {
                    allocation,
                    error: error.to_string(),
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.best().total_cmp(&a.best()));
    (ranked, failures)
}
