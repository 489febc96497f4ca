mod common;
mod report;
mod scenario;
mod simulation;

use crate::report::Report;
use crate::scenario::{Scenario, ScenarioError};
use crate::simulation::error::SimulationError;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Simulates mail delivery over a rail line and prints every train hop.
#[derive(Parser, Debug)]
#[command(name = "train-mail", version)]
struct Args {
    /// Scenario file (TOML) with stations, edges, trains and deliveries.
    scenario: PathBuf,

    /// Maximum hops a single train movement may take.
    #[arg(long)]
    hop_limit: Option<usize>,

    /// Maximum dispatch iterations for the whole run.
    #[arg(long)]
    delivery_limit: Option<usize>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

fn run(args: &Args) -> Result<String, AppError> {
    let scenario = Scenario::load_from_file(&args.scenario)?;
    let mut config = scenario.limits;
    if let Some(hop_limit) = args.hop_limit {
        config = config.with_hop_limit(hop_limit);
    }
    if let Some(delivery_limit) = args.delivery_limit {
        config = config.with_delivery_limit(delivery_limit);
    }

    let mut simulation = scenario.build(config)?;
    simulation.run()?;
    Ok(Report::new(&simulation).to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(scenario = %args.scenario.display(), "{}", err);
            ExitCode::FAILURE
        }
    }
}
