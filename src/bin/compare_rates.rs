//! Compare the best allocation across several normal growth rates
//!
//! Usage: cargo run --bin compare_rates -- [RATE ...]
//! Defaults to 3%, 6%, 9%, 12% and 15% with every other setting at its default.

use std::env;
use std::time::Instant;

use anyhow::Context;
use portfolio_strat::{RunConfig, ScenarioRunner};

const DEFAULT_RATES: [f64; 5] = [0.03, 0.06, 0.09, 0.12, 0.15];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let rates: Vec<f64> = env::args()
        .skip(1)
        .map(|arg| arg.parse::<f64>().with_context(|| format!("invalid rate: {arg}")))
        .collect::<anyhow::Result<_>>()?;
    let rates = if rates.is_empty() { DEFAULT_RATES.to_vec() } else { rates };

    let configs: Vec<RunConfig> = rates
        .iter()
        .map(|&rate| {
            let mut config = RunConfig::default();
            config.params.rate = rate;
            config
        })
        .collect();

    let start = Instant::now();
    let runs = ScenarioRunner::new().run_scenarios(&configs)?;

    println!(
        "{:>8} | {:>12} | {:>12} | {:>12} | {:>14} | {:>14}",
        "Rate", "Principal", "Contribution", "Lump Sum", "Worst", "Best"
    );
    println!("{}", "-".repeat(86));
    for (rate, run) in rates.iter().zip(&runs) {
        match run.top() {
            Some(top) => println!(
                "{:>7.2}% | {:>12.2} | {:>12.2} | {:>12.2} | {:>14.2} | {:>14.2}",
                rate * 100.0,
                top.allocation.principal,
                top.allocation.contribution_pool,
                top.allocation.lump_sum,
                top.worst(),
                top.best(),
            ),
            None => println!("{:>7.2}% | no allocation could be evaluated", rate * 100.0),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
