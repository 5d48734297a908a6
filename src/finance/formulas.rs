//! Discrete compounding formulas
//!
//! Supports:
//! - Compound growth of a lump sum at a nominal annual rate
//! - Future value of a level contribution stream (ordinary annuity or annuity due)

use serde::{Deserialize, Serialize};

/// Periodic rates closer to zero than this use the zero-rate limit of the annuity formula
const ZERO_RATE_TOLERANCE: f64 = 1e-12;

/// When each period's contribution lands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnuityTiming {
    /// Contribution at period end
    #[default]
    Ordinary,
    /// Contribution at period start (one extra compounding step)
    Due,
}

/// Future value of `principal` compounded `periods_per_year` times a year
///
/// A = P(1 + r/n)^(t·n). `years` may be fractional and `annual_rate` may be
/// zero or negative.
pub fn compound_value(principal: f64, annual_rate: f64, years: f64, periods_per_year: u32) -> f64 {
    let n = periods_per_year as f64;
    principal * (1.0 + annual_rate / n).powf(years * n)
}

/// Future value of a level contribution made `periods_per_year` times a year
///
/// C·((1 + r/n)^(n·t) − 1)/(r/n), times (1 + r/n) for an annuity due.
/// At a zero periodic rate the closed form degenerates and the limit C·n·t is used.
pub fn annuity_value(
    contribution: f64,
    annual_rate: f64,
    years: f64,
    periods_per_year: u32,
    timing: AnnuityTiming,
) -> f64 {
    let n = periods_per_year as f64;
    let periodic = annual_rate / n;

    let ordinary = if periodic.abs() < ZERO_RATE_TOLERANCE {
        contribution * n * years
    } else {
        // (1 + i)^N − 1 via exp_m1/ln_1p keeps precision for tiny periodic rates
        contribution * (n * years * periodic.ln_1p()).exp_m1() / periodic
    };

    match timing {
        AnnuityTiming::Ordinary => ordinary,
        AnnuityTiming::Due => ordinary * (1.0 + periodic),
    }
}
