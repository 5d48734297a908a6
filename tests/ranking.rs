use approx::{assert_abs_diff_eq, assert_relative_eq};
use portfolio_strat::{
    compound_value, Allocation, Phase, RunConfig, ScenarioRunner, StrategyError,
};

fn config(recession_enabled: bool) -> RunConfig {
    let mut config = RunConfig {
        total_amount: 10_000.0,
        percentages: vec![1.0, 0.5, 0.0],
        ..RunConfig::default()
    };
    config.params.rate = 0.09;
    config.params.horizon_years = 10.0;
    config.params.contributions_per_year = 12;
    config.params.compounding_per_year = 12;
    config.params.recession_enabled = recession_enabled;
    config
}

#[test]
fn all_principal_without_recession() {
    let run = ScenarioRunner::new().run(&config(false)).unwrap();

    let all_principal = run
        .ranked
        .iter()
        .find(|entry| {
            entry.allocation
                == Allocation {
                    principal: 10_000.0,
                    contribution_pool: 0.0,
                    lump_sum: 0.0,
                }
        })
        .expect("all-principal allocation is generated");

    let expected = compound_value(10_000.0, 0.09, 10.0, 12);
    assert_eq!(all_principal.worst(), all_principal.best());
    assert_relative_eq!(all_principal.best(), expected, max_relative = 1e-12);
    assert_abs_diff_eq!(all_principal.best(), 24_513.57, epsilon = 0.01);

    // Growing the whole amount from day one beats every other split
    assert_eq!(run.top().unwrap().allocation, all_principal.allocation);
}

#[test]
fn reserve_is_idle_without_recession() {
    let run = ScenarioRunner::new().run(&config(false)).unwrap();
    let all_reserve = run
        .ranked
        .iter()
        .find(|entry| entry.allocation.lump_sum == 10_000.0)
        .unwrap();

    assert_eq!(all_reserve.best(), 0.0);
    assert_eq!(run.ranked.last().unwrap().allocation, all_reserve.allocation);
}

#[test]
fn recession_sweep_bounds_every_strategy() {
    let run = ScenarioRunner::new().run(&config(true)).unwrap();
    assert_eq!(run.ranked.len(), 7);
    assert!(run.failures.is_empty());

    for entry in &run.ranked {
        assert!(entry.worst() <= entry.best());
        assert_relative_eq!(entry.strategy.total_allocated(), 10_000.0, max_relative = 1e-12);
    }
    for pair in run.ranked.windows(2) {
        assert!(pair[0].best() >= pair[1].best());
    }
}

#[test]
fn invalid_recession_config_is_reported() {
    let mut config = config(true);
    config.params.recovery_years = 0.0;
    let err = ScenarioRunner::new().run(&config).unwrap_err();
    assert_eq!(err, StrategyError::InvalidRecoveryYears(0.0));
}

#[test]
fn breakdown_with_recession_lists_every_start_year() {
    let run = ScenarioRunner::new().run(&config(true)).unwrap();
    let top = &run.top().unwrap().strategy;
    let rows = ScenarioRunner::new().breakdown(top, true, 1.0).unwrap();

    let mut starts: Vec<u32> = rows.iter().filter_map(|r| r.recession_start_year).collect();
    starts.dedup();
    assert_eq!(starts, (0..10).collect::<Vec<_>>());
    assert!(rows.iter().any(|r| r.phase == Phase::Recovery));
}

#[test]
fn json_round_trip_of_run_config() {
    let config = config(true);
    let json = serde_json::to_string(&config).unwrap();
    let parsed: RunConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
