// scripts/price_barrier.rs
//! Command-line pricer for European barrier options
//!
//! ```text
//! barrier-mc call up_and_out 100 100 120 1 0.2 0.05 50 100000 --seed 42
//! ```

use anyhow::Context;
use barrier_mc::analytics::bs_analytic;
use barrier_mc::contract::{BarrierKind, ContractSpec, OptionKind};
use barrier_mc::math_utils::Timer;
use barrier_mc::mc::mc_engine::{mc_price_barrier_option, McConfig, Retain};
use barrier_mc::output;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Price a European barrier option via Monte Carlo simulation
#[derive(Parser)]
#[command(name = "barrier-mc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// call or put
    option_type: OptionKind,

    /// up_and_out, down_and_out, up_and_in or down_and_in
    barrier_type: BarrierKind,

    /// Initial price of the underlying
    s0: f64,

    /// Strike price
    k: f64,

    /// Barrier price
    b: f64,

    /// Time to maturity in years
    t: f64,

    /// Annual volatility (between 0 and 1)
    volatility: f64,

    /// Annual risk free rate
    #[arg(allow_negative_numbers = true)]
    risk_free_rate: f64,

    /// Number of steps in each simulation
    steps: usize,

    /// Number of simulations
    num_iters: usize,

    /// Seed for the random number generator (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the simulated paths to this CSV file for plotting
    #[arg(long)]
    paths_csv: Option<PathBuf>,

    /// Maximum number of paths written to --paths-csv
    #[arg(long, default_value = "200")]
    max_csv_paths: usize,

    /// Write a key/value run summary to this CSV file
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let threads = cli.threads.unwrap_or_else(num_cpus::get).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to configure worker threads")?;
    info!(threads, "rayon pool configured");

    let contract = ContractSpec::new(
        cli.option_type,
        cli.barrier_type,
        cli.s0,
        cli.k,
        cli.b,
        cli.t,
        cli.volatility,
        cli.risk_free_rate,
    )?;

    let retain = if cli.paths_csv.is_some() {
        Retain::PATHS
    } else {
        Retain::NONE
    };
    let cfg = McConfig {
        steps: cli.steps,
        paths: cli.num_iters,
        seed: cli.seed,
        retain,
    };

    let timer = Timer::new();
    let result = mc_price_barrier_option(&contract, &cfg)?;
    let elapsed_ms = timer.elapsed_ms();
    let reference = bs_analytic::barrier_price_continuous(&contract);

    if cli.json {
        let report = json!({
            "contract": contract,
            "steps": cli.steps,
            "simulations": cli.num_iters,
            "seed": result.seed(),
            "estimated_value": result.price(),
            "std_error": result.std_error(),
            "continuous_monitoring_reference": reference,
            "elapsed_ms": elapsed_ms,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", contract);
        println!("{:<32}{}", "Number of steps:", cli.steps);
        println!("{:<32}{}", "Number of simulations:", cli.num_iters);
        println!("{:<32}{}", "Seed:", result.seed());
        println!("\nEstimated contract value: {}", result.price());
        println!("Standard error:           {:.6}", result.std_error());
        println!("Continuous-barrier value: {:.6}", reference);
        println!("Elapsed:                  {:.1} ms", elapsed_ms);
    }

    if let (Some(file), Some(batch)) = (&cli.paths_csv, result.paths()) {
        output::write_paths_to_csv(file, batch, &contract, Some(cli.max_csv_paths))
            .with_context(|| format!("failed to write paths to {}", file.display()))?;
        info!(file = %file.display(), title = %contract.title(), "paths written");
    }

    if let Some(file) = &cli.summary_csv {
        let mut rows = contract.describe();
        rows.extend([
            ("Number of steps", cli.steps.to_string()),
            ("Number of simulations", cli.num_iters.to_string()),
            ("Seed", result.seed().to_string()),
            ("Estimated contract value", result.price().to_string()),
            ("Standard error", result.std_error().to_string()),
        ]);
        output::write_summary_to_csv(file, &rows)
            .with_context(|| format!("failed to write summary to {}", file.display()))?;
    }

    Ok(())
}
