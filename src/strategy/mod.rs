//! Strategy records, allocation generation and run configuration

mod data;
mod allocation;
pub mod config;

pub use data::{BalanceRange, Strategy, StrategyParams};
pub use allocation::{Allocation, AllocationGrid, DEFAULT_ALLOCATION_PCTS};
pub use config::{ConfigError, RunConfig};
