//! Portfolio Strat - allocation strategy estimator for a fixed investment budget
//!
//! This library provides:
//! - Closed-form compound growth and annuity formulas
//! - A three-phase recession model (pre-drop growth, recovery, post-recovery growth)
//! - A sweep over every recession start year bounding best and worst final balance
//! - Enumeration of principal / contribution / lump-sum splits of a total amount
//! - Parallel batch evaluation and ranking of those splits

pub mod error;
pub mod finance;
pub mod projection;
pub mod strategy;
pub mod scenario;

// Re-export commonly used types
pub use error::StrategyError;
pub use finance::{annuity_value, compound_value, derive_recovery_rate, AnnuityTiming};
pub use projection::{EngineConfig, Phase, ScenarioEngine, Snapshot, TraceRow};
pub use strategy::{Allocation, AllocationGrid, BalanceRange, RunConfig, Strategy, StrategyParams};
pub use scenario::{RankedRun, RankedStrategy, ScenarioRunner};
