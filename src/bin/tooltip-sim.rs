//! Tooltip link replay tool
//!
//! Runs a scenario file (page fixture, binder configuration, steps) against
//! an in-memory page and prints a JSON report of the tool results, the
//! window-open requests and any default navigations.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tooltip_links::{BindingStrategy, LoggingOpener, Scenario};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// One document-level listener (default)
    Delegated,
    /// One listener per element present at load
    PerElement,
}

impl From<Strategy> for BindingStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Delegated => BindingStrategy::Delegated,
            Strategy::PerElement => BindingStrategy::PerElement,
        }
    }
}

#[derive(Parser)]
#[command(name = "tooltip-sim")]
#[command(version)]
#[command(about = "Replay tooltip link clicks against a page fixture", long_about = None)]
struct Cli {
    /// Scenario JSON file
    #[arg(value_name = "FILE")]
    scenario: PathBuf,

    /// Override the binding strategy from the scenario
    #[arg(long, short = 's', value_enum)]
    strategy: Option<Strategy>,

    /// Log clicked elements and hrefs
    #[arg(long, short = 'd')]
    debug: bool,

    /// Log each window-open request at info level as it happens
    #[arg(long)]
    log_opens: bool,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,

    /// Exit with status 1 if any step failed
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "debug"
    } else if cli.log_opens {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let raw = std::fs::read_to_string(&cli.scenario)
        .with_context(|| format!("Failed to read {}", cli.scenario.display()))?;
    let mut scenario = Scenario::from_json_str(&raw)
        .with_context(|| format!("Failed to parse {}", cli.scenario.display()))?;

    if let Some(strategy) = cli.strategy {
        scenario.config.strategy = strategy.into();
    }
    if cli.debug {
        scenario.config.debug = true;
    }

    log::info!(
        "replaying {} step(s) with {:?} binding",
        scenario.steps.len(),
        scenario.config.strategy
    );

    let report = if cli.log_opens {
        scenario.run_with_opener(Box::new(LoggingOpener))
    } else {
        scenario.run()
    }
    .context("Scenario run failed")?;

    let output = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    if cli.strict && !report.all_succeeded() {
        std::process::exit(1);
    }

    Ok(())
}
