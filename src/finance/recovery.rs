//! Recovery rate after a recessionary drawdown
//!
//! Solved independently of the normal annual rate: it only depends on how
//! much of the balance was retained and how long the recovery may take.

use crate::error::{Result, StrategyError};

/// Nominal annual rate that restores a drawn-down balance in `recovery_years`
///
/// Solves `B·d·(1 + r/n)^(n·T) = B` for `r`:
/// `r = n·((1/d)^(1/(n·T)) − 1)`.
///
/// # Arguments
/// * `drawdown_fraction` - Fraction of the balance retained after the shock, in (0, 1]
/// * `recovery_years` - Time allotted to get back to the pre-shock balance
/// * `periods_per_year` - Compounding periods per year
pub fn derive_recovery_rate(
    drawdown_fraction: f64,
    recovery_years: f64,
    periods_per_year: u32,
) -> Result<f64> {
    if !drawdown_fraction.is_finite() || drawdown_fraction <= 0.0 || drawdown_fraction > 1.0 {
        return Err(StrategyError::InvalidDrawdown(drawdown_fraction));
    }
    if !recovery_years.is_finite() || recovery_years <= 0.0 {
        return Err(StrategyError::InvalidRecoveryYears(recovery_years));
    }
    if periods_per_year == 0 {
        return Err(StrategyError::ZeroCompoundingPerYear);
    }

    let n = periods_per_year as f64;
    Ok(n * ((1.0 / drawdown_fraction).powf(1.0 / (n * recovery_years)) - 1.0))
}
