//! Run configuration: total amount, percentage grid and shared strategy parameters
//!
//! Loaded from JSON; any field left out falls back to its default.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::allocation::{AllocationGrid, DEFAULT_ALLOCATION_PCTS};
use super::data::StrategyParams;
use crate::error::StrategyError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read run config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse run config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid run config: {0}")]
    Invalid(#[from] StrategyError),
}

/// Everything needed to generate, evaluate and rank a batch of strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Amount split across principal, contributions and lump sum
    #[serde(default = "default_total_amount")]
    pub total_amount: f64,

    /// Percentage grid crossed with itself to produce allocations
    #[serde(default = "default_percentages")]
    pub percentages: Vec<f64>,

    /// Phase step in years (one snapshot per step)
    #[serde(default = "default_step_years")]
    pub step_years: f64,

    #[serde(flatten)]
    pub params: StrategyParams,
}

fn default_total_amount() -> f64 { 10_000.0 }
fn default_percentages() -> Vec<f64> { DEFAULT_ALLOCATION_PCTS.to_vec() }
fn default_step_years() -> f64 { 1.0 }

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_amount: default_total_amount(),
            percentages: default_percentages(),
            step_years: default_step_years(),
            params: StrategyParams::default(),
        }
    }
}

impl RunConfig {
    /// Load a run config from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StrategyError> {
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(StrategyError::InvalidAmount {
                field: "total_amount",
                value: self.total_amount,
            });
        }
        if !self.step_years.is_finite() || self.step_years <= 0.0 {
            return Err(StrategyError::InvalidStep(self.step_years));
        }
        self.grid()?;
        self.params.validate()
    }

    pub fn grid(&self) -> Result<AllocationGrid, StrategyError> {
        AllocationGrid::new(self.percentages.clone())
    }
}
