//! Domain errors raised while validating or evaluating a strategy

use thiserror::Error;

/// Configuration errors that make a strategy impossible to evaluate.
///
/// Every variant is deterministic: re-running the same evaluation fails the
/// same way, so callers should report and skip the strategy rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("drawdown fraction must be in (0, 1], got {0}")]
    InvalidDrawdown(f64),

    #[error("recovery time must be a positive number of years, got {0}")]
    InvalidRecoveryYears(f64),

    #[error("horizon must be a positive number of years, got {0}")]
    InvalidHorizon(f64),

    #[error("contributions per year must be greater than zero")]
    ZeroContributionsPerYear,

    #[error("compounding periods per year must be greater than zero")]
    ZeroCompoundingPerYear,

    #[error("phase step must be a positive number of years, got {0}")]
    InvalidStep(f64),

    #[error("annual rate {rate} over {periods} periods wipes out the balance each period")]
    RateBelowTotalLoss { rate: f64, periods: u32 },

    #[error("{field} must be a finite, non-negative amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("allocation percentage must be within [0, 1], got {0}")]
    InvalidPercentage(f64),

    #[error("allocation grid is empty")]
    EmptyGrid,

    #[error("scenario sweep produced no final balances")]
    EmptySweep,
}

pub type Result<T> = std::result::Result<T, StrategyError>;
