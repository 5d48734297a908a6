//! Scenario evaluation: best and worst final balance of a strategy

use log::debug;

use super::path::{ScenarioPath, TraceRow};
use crate::error::{Result, StrategyError};
use crate::finance::derive_recovery_rate;
use crate::strategy::{BalanceRange, Strategy};

/// Configuration for an evaluation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Phase step in years; one trace row per step
    pub step_years: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { step_years: 1.0 }
    }
}

/// Evaluates strategies under the no-recession or recession-sweep model
#[derive(Debug, Clone, Default)]
pub struct ScenarioEngine {
    config: EngineConfig,
}

impl ScenarioEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Every scenario of a strategy, lazily
    ///
    /// Without a recession there is a single growth path over the whole horizon.
    /// With one, there is a path per start year `i = 0, 1, ...` while `i < horizon`.
    /// The recovery rate always uses the full recovery time, even when a late
    /// recession leaves less of the horizon than that.
    pub fn scenarios<'a>(
        &self,
        strategy: &'a Strategy,
    ) -> Result<impl Iterator<Item = ScenarioPath<'a>> + 'a> {
        if !self.config.step_years.is_finite() || self.config.step_years <= 0.0 {
            return Err(StrategyError::InvalidStep(self.config.step_years));
        }
        strategy.validate()?;

        // Validation above keeps the ceiling within u32
        let sweep = strategy
            .recession_enabled
            .then(|| (0..strategy.horizon_years.ceil() as u32).map(Some));
        let single = (!strategy.recession_enabled).then_some(None);

        let recovery_rate = if strategy.recession_enabled {
            derive_recovery_rate(
                strategy.drawdown_fraction,
                strategy.recovery_years,
                strategy.compounding_per_year,
            )?
        } else {
            0.0
        };

        let step_years = self.config.step_years;
        Ok(sweep
            .into_iter()
            .flatten()
            .chain(single)
            .map(move |start| ScenarioPath::new(strategy, step_years, recovery_rate, start)))
    }

    /// Fold every scenario's final balance into a best/worst range
    pub fn evaluate(&self, strategy: &Strategy) -> Result<BalanceRange> {
        let range = BalanceRange::from_balances(
            self.scenarios(strategy)?
                .filter_map(ScenarioPath::final_balance),
        )
        .ok_or(StrategyError::EmptySweep)?;

        debug!(
            "Evaluated principal={:.2} contribution={:.2} lump_sum={:.2}: worst={:.2} best={:.2}",
            strategy.principal, strategy.contribution, strategy.lump_sum, range.min, range.max
        );
        Ok(range)
    }

    /// Evaluate and record the outcome on the strategy
    ///
    /// On failure the strategy is left untouched.
    pub fn evaluate_in_place(&self, strategy: &mut Strategy) -> Result<BalanceRange> {
        let range = self.evaluate(strategy)?;
        strategy.outcome = Some(range);
        Ok(range)
    }

    /// Every trace row of every scenario, for a yearly breakdown
    pub fn trace<'a>(&self, strategy: &'a Strategy) -> Result<impl Iterator<Item = TraceRow> + 'a> {
        Ok(self.scenarios(strategy)?.flatten())
    }
}
