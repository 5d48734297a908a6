use portfolio_strat::{
    annuity_value, compound_value, derive_recovery_rate, AllocationGrid, AnnuityTiming,
    ScenarioEngine, Strategy, StrategyParams,
};
use proptest::prelude::*;

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn zero_rate_compounding_is_identity(
        principal in 0.0f64..1e7,
        years in 0.0f64..60.0,
        periods in 1u32..=365,
    ) {
        prop_assert_eq!(compound_value(principal, 0.0, years, periods), principal);
    }

    #[test]
    fn zero_rate_annuity_is_plain_sum(
        contribution in 0.0f64..1e5,
        years in 0.0f64..60.0,
        periods in 1u32..=52,
    ) {
        let fv = annuity_value(contribution, 0.0, years, periods, AnnuityTiming::Ordinary);
        prop_assert!(close(fv, contribution * periods as f64 * years, 1e-12));
    }

    #[test]
    fn annuity_due_is_one_period_ahead(
        contribution in 1.0f64..1e5,
        rate in -0.5f64..0.5,
        years in 0.0f64..40.0,
        periods in 1u32..=12,
    ) {
        let ordinary = annuity_value(contribution, rate, years, periods, AnnuityTiming::Ordinary);
        let due = annuity_value(contribution, rate, years, periods, AnnuityTiming::Due);
        prop_assert!(close(due, ordinary * (1.0 + rate / periods as f64), 1e-12));
    }

    #[test]
    fn recovery_rate_round_trips(
        balance in 1.0f64..1e7,
        drawdown in 0.05f64..=1.0,
        recovery_years in 0.1f64..20.0,
        periods in 1u32..=12,
    ) {
        let rate = derive_recovery_rate(drawdown, recovery_years, periods).unwrap();
        let restored = compound_value(balance * drawdown, rate, recovery_years, periods);
        prop_assert!(close(restored, balance, 1e-9));
    }

    #[test]
    fn allocations_conserve_budget(total in 0.0f64..1e7) {
        let allocations = AllocationGrid::default().generate(total).unwrap();
        for allocation in &allocations {
            prop_assert!(close(allocation.total(), total, 1e-12));
        }
        for pair in allocations.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn no_recession_has_no_spread(
        principal in 0.0f64..1e6,
        contribution in 0.0f64..1e4,
        rate in -0.2f64..0.3,
        horizon in 0.5f64..40.0,
    ) {
        let params = StrategyParams {
            rate,
            horizon_years: horizon,
            recession_enabled: false,
            ..StrategyParams::default()
        };
        let strategy = Strategy::new(principal, contribution, 0.0, &params);
        let range = ScenarioEngine::default().evaluate(&strategy).unwrap();
        prop_assert_eq!(range.min, range.max);
    }

    #[test]
    fn recession_worst_never_exceeds_best(
        principal in 0.0f64..1e6,
        contribution in 0.0f64..1e4,
        lump_sum in 0.0f64..1e6,
        rate in 0.0f64..0.3,
        horizon in 1.0f64..30.0,
        drawdown in 0.1f64..=1.0,
        recovery_years in 0.1f64..10.0,
    ) {
        let params = StrategyParams {
            rate,
            horizon_years: horizon,
            recession_enabled: true,
            drawdown_fraction: drawdown,
            recovery_years,
            ..StrategyParams::default()
        };
        let strategy = Strategy::new(principal, contribution, lump_sum, &params);
        let range = ScenarioEngine::default().evaluate(&strategy).unwrap();
        prop_assert!(range.min <= range.max);
        prop_assert!(range.min.is_finite());
    }
}
