//! Portfolio Strat CLI
//!
//! Ranks every split of a total amount across principal, periodic contributions
//! and a recession reserve, and optionally prints a yearly breakdown for one split.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use serde::Serialize;

use portfolio_strat::{AnnuityTiming, Phase, RankedRun, RunConfig, ScenarioRunner, TraceRow};

const USAGE: &str = "\
Examples:

  Allocation report, 9% annual return, 10k over 10 years (default):
    portfolio_strat -a 10000 -t 10 -r 0.09 --drop-pct 0.47 --time-to-recover 0.50

  15% annual return with no recessionary event:
    portfolio_strat -r 0.15 --include-recession false

  15% annual return with a yearly breakdown for allocation #0:
    portfolio_strat -r 0.15 -b 0

  100k over 33 years, up to 13.5 years to recover after a recession:
    portfolio_strat -a 100000 -t 33 --time-to-recover 13.5";

#[derive(Parser, Debug)]
#[command(
    name = "portfolio_strat",
    about = "Ranks principal / contribution / lump-sum allocations under a recession sweep",
    after_help = USAGE
)]
struct Cli {
    /// Total amount to allocate
    #[arg(short = 'a', long)]
    amount: Option<f64>,

    /// Investment horizon in years
    #[arg(short = 't', long)]
    years: Option<f64>,

    /// Nominal annual rate of return
    #[arg(short = 'r', long)]
    rate: Option<f64>,

    /// Fraction of the balance retained after the drop (0.47 keeps 47%)
    #[arg(long = "drop-pct")]
    drop_pct: Option<f64>,

    /// Years allowed to recover the pre-drop balance
    #[arg(long = "time-to-recover")]
    time_to_recover: Option<f64>,

    /// Sweep a recession across every start year
    #[arg(long = "include-recession", action = ArgAction::Set)]
    include_recession: Option<bool>,

    #[arg(long)]
    contributions_per_year: Option<u32>,

    #[arg(long)]
    compounding_per_year: Option<u32>,

    /// Contributions land at the start of each period
    #[arg(long)]
    annuity_due: bool,

    /// Breakdown step in years
    #[arg(long)]
    step_years: Option<f64>,

    /// Show a yearly breakdown for the ranked allocation at this index
    #[arg(short = 'b', long)]
    breakdown: Option<usize>,

    /// Keep the recession on in the breakdown (every start year is shown)
    #[arg(long)]
    breakdown_with_recession: bool,

    /// JSON run config; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the ranked run as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write the ranked table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(amount) = self.amount {
            config.total_amount = amount;
        }
        if let Some(step) = self.step_years {
            config.step_years = step;
        }

        let params = &mut config.params;
        if let Some(years) = self.years {
            params.horizon_years = years;
        }
        if let Some(rate) = self.rate {
            params.rate = rate;
        }
        if let Some(drop_pct) = self.drop_pct {
            params.drawdown_fraction = drop_pct;
        }
        if let Some(recover) = self.time_to_recover {
            params.recovery_years = recover;
        }
        if let Some(enabled) = self.include_recession {
            params.recession_enabled = enabled;
        }
        if let Some(n) = self.contributions_per_year {
            params.contributions_per_year = n;
        }
        if let Some(n) = self.compounding_per_year {
            params.compounding_per_year = n;
        }
        if self.annuity_due {
            params.annuity_timing = AnnuityTiming::Due;
        }

        Ok(config)
    }
}

/// One row of the ranked table as written to CSV
#[derive(Debug, Serialize)]
struct CsvRow {
    rank: usize,
    principal: f64,
    principal_pct: f64,
    contribution_pool: f64,
    contribution_pct: f64,
    lump_sum: f64,
    lump_sum_pct: f64,
    worst: f64,
    best: f64,
}

fn pct(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

fn csv_rows(run: &RankedRun) -> impl Iterator<Item = CsvRow> + '_ {
    let total = run.config.total_amount;
    run.ranked.iter().enumerate().map(move |(rank, entry)| {
        let a = &entry.allocation;
        CsvRow {
            rank,
            principal: a.principal,
            principal_pct: pct(a.principal, total),
            contribution_pool: a.contribution_pool,
            contribution_pct: pct(a.contribution_pool, total),
            lump_sum: a.lump_sum,
            lump_sum_pct: pct(a.lump_sum, total),
            worst: entry.worst(),
            best: entry.best(),
        }
    })
}

fn write_csv(path: &Path, run: &RankedRun) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in csv_rows(run) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_setup(config: &RunConfig) {
    let params = &config.params;
    println!("Portfolio setup:");
    println!("  Total amount allocated:  {:.2}", config.total_amount);
    println!("  Timespan (y):            {:.2}", params.horizon_years);
    println!("  Rate:                    {:.4}", params.rate);
    println!("  Contributions per year:  {}", params.contributions_per_year);
    println!("  Compounding per year:    {}", params.compounding_per_year);
    if params.recession_enabled {
        println!("  Retained after drop:     {:.2}%", params.drawdown_fraction * 100.0);
        println!("  Time to recover (y):     {:.2}", params.recovery_years);
    } else {
        println!("  Recession:               none");
    }
}

fn print_table(run: &RankedRun) {
    let header = format!(
        "{:>4} | {:>14} {:>8} | {:>14} {:>8} | {:>14} {:>8} | {:>14} | {:>14}",
        "#", "Principal", "%", "Contribution", "%", "Lump Sum", "%", "Worst", "Best"
    );
    println!("\nStrategy Allocations:");
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for row in csv_rows(run) {
        println!(
            "{:>4} | {:>14.2} {:>7.2}% | {:>14.2} {:>7.2}% | {:>14.2} {:>7.2}% | {:>14.2} | {:>14.2}",
            row.rank,
            row.principal,
            row.principal_pct,
            row.contribution_pool,
            row.contribution_pct,
            row.lump_sum,
            row.lump_sum_pct,
            row.worst,
            row.best,
        );
    }

    if !run.failures.is_empty() {
        println!("\nFailed allocations ({}):", run.failures.len());
        for failure in &run.failures {
            let a = &failure.allocation;
            println!(
                "  {:.2} / {:.2} / {:.2}: {}",
                a.principal, a.contribution_pool, a.lump_sum, failure.error
            );
        }
    }
}

fn phase_label(row: &TraceRow) -> String {
    match (row.phase, row.recession_start_year) {
        (Phase::Growth, _) => "Growth, no recession".to_string(),
        (Phase::PreRecession, Some(year)) => format!("Recession at year {}: pre recession", year),
        (Phase::Recovery, Some(year)) => format!("Recession at year {}: recovery", year),
        (Phase::PostRecession, Some(year)) => format!("Recession at year {}: post recession", year),
        (phase, None) => format!("{:?}", phase),
    }
}

fn print_breakdown(rows: &[TraceRow]) {
    let header = format!(
        "{:>7} | {:>16} | {:>16} | {:>16} | {:>10}",
        "Period", "FV Principal", "FV Contributions", "Balance", "Rate"
    );
    let mut current: Option<(Phase, Option<u32>)> = None;

    for row in rows {
        if current != Some((row.phase, row.recession_start_year)) {
            current = Some((row.phase, row.recession_start_year));
            println!("\n{}", phase_label(row));
            println!("{}", header);
            println!("{}", "-".repeat(header.len()));
        }
        println!(
            "{:>7.2} | {:>16.2} | {:>16.2} | {:>16.2} | {:>10.5}",
            row.elapsed_years,
            row.principal_value,
            row.contributions_value,
            row.balance,
            row.annual_rate,
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.run_config()?;

    let runner = ScenarioRunner::new();
    let run = runner.run(&config).context("evaluating allocations")?;

    if let Some(path) = &cli.csv {
        write_csv(path, &run)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_setup(&config);
        print_table(&run);
        if let Some(path) = &cli.csv {
            println!("\nRanked table written to: {}", path.display());
        }
    }

    if let Some(index) = cli.breakdown {
        let Some(entry) = run.ranked.get(index) else {
            bail!(
                "breakdown index {} is out of range (0..{})",
                index,
                run.ranked.len()
            );
        };
        let rows = runner.breakdown(
            &entry.strategy,
            cli.breakdown_with_recession,
            config.step_years,
        )?;
        println!("\nShowing yearly breakdown for allocation #{}", index);
        print_breakdown(&rows);
    }

    Ok(())
}
