//! Enumeration of principal / contribution / lump-sum splits of a total amount

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

/// Default percentage grid; two thirds and one third are truncated to six places
pub const DEFAULT_ALLOCATION_PCTS: [f64; 13] = [
    1.00, 0.80, 0.75, 0.666666, 0.60, 0.50, 0.40, 0.333333, 0.30, 0.25, 0.20, 0.10, 0.0,
];

/// A split of the total amount across the three roles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub principal: f64,
    pub contribution_pool: f64,
    pub lump_sum: f64,
}

impl Allocation {
    pub fn total(&self) -> f64 {
        self.principal + self.contribution_pool + self.lump_sum
    }

    /// Bit-level identity used for deduplication (+0.0 and -0.0 collapse)
    fn key(&self) -> [u64; 3] {
        [
            (self.principal + 0.0).to_bits(),
            (self.contribution_pool + 0.0).to_bits(),
            (self.lump_sum + 0.0).to_bits(),
        ]
    }

    fn cmp_lexicographic(&self, other: &Self) -> std::cmp::Ordering {
        self.principal
            .total_cmp(&other.principal)
            .then(self.contribution_pool.total_cmp(&other.contribution_pool))
            .then(self.lump_sum.total_cmp(&other.lump_sum))
    }
}

/// Percentage grid crossed with itself to produce candidate allocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationGrid {
    percentages: Vec<f64>,
}

impl AllocationGrid {
    pub fn new(percentages: Vec<f64>) -> Result<Self> {
        if percentages.is_empty() {
            return Err(StrategyError::EmptyGrid);
        }
        if let Some(&bad) = percentages
            .iter()
            .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
        {
            return Err(StrategyError::InvalidPercentage(bad));
        }
        Ok(Self { percentages })
    }

    /// Every distinct split of `total_amount`, sorted by (principal, pool, lump sum)
    ///
    /// For each pair `(p_i, p_j)`: principal = total·p_i, pool = (total − principal)·p_j,
    /// lump sum = the remainder. Each triple is computed straight from the inputs,
    /// so exact equality is a sound deduplication key.
    pub fn generate(&self, total_amount: f64) -> Result<Vec<Allocation>> {
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(StrategyError::InvalidAmount {
                field: "total_amount",
                value: total_amount,
            });
        }

        let mut seen = HashSet::new();
        let mut allocations = Vec::with_capacity(self.percentages.len().pow(2));

        for &p_principal in &self.percentages {
            for &p_pool in &self.percentages {
                let principal = total_amount * p_principal;
                let contribution_pool = (total_amount - principal) * p_pool;
                let lump_sum = total_amount - principal - contribution_pool;
                let allocation = Allocation {
                    principal,
                    contribution_pool,
                    lump_sum,
                };
                if seen.insert(allocation.key()) {
                    allocations.push(allocation);
                }
            }
        }

        allocations.sort_by(Allocation::cmp_lexicographic);
        log::debug!(
            "Generated {} distinct allocations from a {}-point grid",
            allocations.len(),
            self.percentages.len()
        );
        Ok(allocations)
    }
}

impl Default for AllocationGrid {
    fn default() -> Self {
        Self {
            percentages: DEFAULT_ALLOCATION_PCTS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_grid() {
        let grid = AllocationGrid::new(vec![1.0, 0.5, 0.0]).unwrap();
        let allocations = grid.generate(10_000.0).unwrap();

        // p_i = 1.0 collapses three pairs into one; p_i = 0.5 and 0.0 each give three
        assert_eq!(allocations.len(), 7);
        assert_eq!(
            allocations.last().copied(),
            Some(Allocation {
                principal: 10_000.0,
                contribution_pool: 0.0,
                lump_sum: 0.0,
            })
        );
        assert_eq!(
            allocations[0],
            Allocation {
                principal: 0.0,
                contribution_pool: 0.0,
                lump_sum: 10_000.0,
            }
        );
    }

    #[test]
    fn test_budget_conserved() {
        let allocations = AllocationGrid::default().generate(10_000.0).unwrap();
        for allocation in &allocations {
            assert_relative_eq!(allocation.total(), 10_000.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_no_duplicates_and_sorted() {
        let allocations = AllocationGrid::default().generate(10_000.0).unwrap();
        // 12 non-unit principals x 13 pools, plus the single all-principal split
        assert_eq!(allocations.len(), 12 * 13 + 1);

        for pair in allocations.windows(2) {
            assert_eq!(pair[0].cmp_lexicographic(&pair[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_full_principal_leaves_nothing_else() {
        let allocations = AllocationGrid::default().generate(2_500.0).unwrap();
        let full: Vec<_> = allocations
            .iter()
            .filter(|a| a.principal == 2_500.0)
            .collect();
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].contribution_pool, 0.0);
        assert_eq!(full[0].lump_sum, 0.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert_eq!(AllocationGrid::new(vec![]), Err(StrategyError::EmptyGrid));
        assert_eq!(
            AllocationGrid::new(vec![0.5, 1.2]),
            Err(StrategyError::InvalidPercentage(1.2))
        );
        assert!(AllocationGrid::default().generate(-1.0).is_err());
        assert!(AllocationGrid::default().generate(f64::INFINITY).is_err());
    }
}
