//! Closed-form growth formulas and the derived recession recovery rate

mod formulas;
mod recovery;

pub use formulas::{annuity_value, compound_value, AnnuityTiming};
pub use recovery::derive_recovery_rate;
