//! Strategy records and the strategy-wide parameters they are built from

use serde::{Deserialize, Serialize};

use super::allocation::Allocation;
use crate::error::{Result, StrategyError};
use crate::finance::AnnuityTiming;

/// Parameters shared by every strategy in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Nominal annual growth rate under normal conditions
    pub rate: f64,

    /// Total simulated duration in years
    pub horizon_years: f64,

    /// Contributions (and contribution compounding periods) per year
    pub contributions_per_year: u32,

    /// Compounding periods per year for the principal
    pub compounding_per_year: u32,

    pub annuity_timing: AnnuityTiming,

    /// Whether to sweep a recession across every start year
    pub recession_enabled: bool,

    /// Fraction of the balance retained right after the shock
    pub drawdown_fraction: f64,

    /// Years allotted to restore the pre-shock balance
    pub recovery_years: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            rate: 0.09,
            horizon_years: 10.0,
            contributions_per_year: 12,
            compounding_per_year: 12,
            annuity_timing: AnnuityTiming::Ordinary,
            recession_enabled: true,
            drawdown_fraction: 0.47,
            recovery_years: 0.5,
        }
    }
}

impl StrategyParams {
    /// Check the parameters that every evaluation depends on.
    ///
    /// Recession parameters are only checked when the recession is enabled.
    pub fn validate(&self) -> Result<()> {
        // Recession start years are counted in u32
        if !self.horizon_years.is_finite()
            || self.horizon_years <= 0.0
            || self.horizon_years.ceil() > u32::MAX as f64
        {
            return Err(StrategyError::InvalidHorizon(self.horizon_years));
        }
        if self.contributions_per_year == 0 {
            return Err(StrategyError::ZeroContributionsPerYear);
        }
        if self.compounding_per_year == 0 {
            return Err(StrategyError::ZeroCompoundingPerYear);
        }
        if !self.rate.is_finite() {
            return Err(StrategyError::NonFinite { field: "rate", value: self.rate });
        }
        for periods in [self.compounding_per_year, self.contributions_per_year] {
            if self.rate / periods as f64 <= -1.0 {
                return Err(StrategyError::RateBelowTotalLoss { rate: self.rate, periods });
            }
        }

        if self.recession_enabled {
            if !self.drawdown_fraction.is_finite()
                || self.drawdown_fraction <= 0.0
                || self.drawdown_fraction > 1.0
            {
                return Err(StrategyError::InvalidDrawdown(self.drawdown_fraction));
            }
            if !self.recovery_years.is_finite() || self.recovery_years <= 0.0 {
                return Err(StrategyError::InvalidRecoveryYears(self.recovery_years));
            }
        }

        Ok(())
    }
}

/// Best and worst final balance of an evaluated strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceRange {
    pub min: f64,
    pub max: f64,
}

impl BalanceRange {
    /// A range with no variability
    pub fn single(balance: f64) -> Self {
        Self { min: balance, max: balance }
    }

    /// Fold final balances into their minimum and maximum
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_balances<I: IntoIterator<Item = f64>>(balances: I) -> Option<Self> {
        balances.into_iter().fold(None, |range, balance| {
            Some(match range {
                None => Self::single(balance),
                Some(Self { min, max }) => Self {
                    min: min.min(balance),
                    max: max.max(balance),
                },
            })
        })
    }

    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

/// One candidate split of the total amount, plus the growth model applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Amount invested up front
    pub principal: f64,

    /// Reserve injected at the moment of a recession
    pub lump_sum: f64,

    /// Amount contributed each contribution period
    pub contribution: f64,

    pub contributions_per_year: u32,
    pub compounding_per_year: u32,
    pub annuity_timing: AnnuityTiming,
    pub rate: f64,
    pub horizon_years: f64,
    pub recession_enabled: bool,
    pub drawdown_fraction: f64,
    pub recovery_years: f64,

    /// Final balance bounds, set once by a successful evaluation
    pub outcome: Option<BalanceRange>,
}

impl Strategy {
    /// Create an unevaluated strategy from explicit amounts
    pub fn new(principal: f64, contribution: f64, lump_sum: f64, params: &StrategyParams) -> Self {
        Self {
            principal,
            lump_sum,
            contribution,
            contributions_per_year: params.contributions_per_year,
            compounding_per_year: params.compounding_per_year,
            annuity_timing: params.annuity_timing,
            rate: params.rate,
            horizon_years: params.horizon_years,
            recession_enabled: params.recession_enabled,
            drawdown_fraction: params.drawdown_fraction,
            recovery_years: params.recovery_years,
            outcome: None,
        }
    }

    /// Spread an allocation's contribution pool evenly over every contribution period
    pub fn from_allocation(allocation: &Allocation, params: &StrategyParams) -> Result<Self> {
        params.validate()?;
        let periods = params.contributions_per_year as f64 * params.horizon_years;
        Ok(Self::new(
            allocation.principal,
            allocation.contribution_pool / periods,
            allocation.lump_sum,
            params,
        ))
    }

    /// Strategy-wide parameters this strategy was built with
    pub fn params(&self) -> StrategyParams {
        StrategyParams {
            rate: self.rate,
            horizon_years: self.horizon_years,
            contributions_per_year: self.contributions_per_year,
            compounding_per_year: self.compounding_per_year,
            annuity_timing: self.annuity_timing,
            recession_enabled: self.recession_enabled,
            drawdown_fraction: self.drawdown_fraction,
            recovery_years: self.recovery_years,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("principal", self.principal),
            ("lump_sum", self.lump_sum),
            ("contribution", self.contribution),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StrategyError::InvalidAmount { field, value });
            }
        }
        self.params().validate()
    }

    /// Total contributed over the whole horizon
    pub fn contribution_pool(&self) -> f64 {
        self.contribution * self.contributions_per_year as f64 * self.horizon_years
    }

    /// Principal + contribution pool + lump sum
    pub fn total_allocated(&self) -> f64 {
        self.principal + self.contribution_pool() + self.lump_sum
    }

    /// Copy of this strategy with the recession toggled and no outcome yet
    pub fn with_recession(&self, enabled: bool) -> Self {
        Self {
            recession_enabled: enabled,
            outcome: None,
            ..self.clone()
        }
    }

    pub fn min_final_balance(&self) -> Option<f64> {
        self.outcome.map(|range| range.min)
    }

    pub fn max_final_balance(&self) -> Option<f64> {
        self.outcome.map(|range| range.max)
    }
}
