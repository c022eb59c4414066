mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analysis::{InputArgs, Tier1Args};
use commands::benchmarks::{BenchmarksArgs, SimulateDpoArgs, SimulateDsoArgs};

/// Tiered financial diagnostics for small businesses
#[derive(Parser)]
#[command(
    name = "growli",
    version,
    about = "Tiered financial diagnostics for small businesses",
    long_about = "Computes financial indicators in three disclosure tiers, fills gaps with \
                  sector defaults, projects six months of cash under three scenarios and \
                  builds a 30/60/90-day action plan. All arithmetic uses decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Replacement sector benchmark table (JSON or YAML)
    #[arg(long, global = true)]
    benchmarks: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tier 1 only (margins, break-even, liquidity, runway)
    Tier1(Tier1Args),
    /// Run every tier supplied in the request and diagnose
    Analyze(InputArgs),
    /// Six-month favorable / neutral / adverse projection from a baseline
    Project(InputArgs),
    /// Score, gaps, opportunities and action plan for a request
    Diagnose(InputArgs),
    /// Show sector benchmarks (all sectors, or one with --sector)
    Benchmarks(BenchmarksArgs),
    /// Cash released by collecting receivables sooner
    SimulateDso(SimulateDsoArgs),
    /// Cash retained by paying suppliers later
    SimulateDpo(SimulateDpoArgs),
    /// Map a statement-extraction field map onto tier snapshots
    Extract(InputArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let table = match input::file::load_benchmarks(cli.benchmarks.as_deref()) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Tier1(args) => commands::analysis::run_tier1(args, &table),
        Commands::Analyze(args) => commands::analysis::run_analyze(args, &table),
        Commands::Project(args) => commands::analysis::run_project(args),
        Commands::Diagnose(args) => commands::analysis::run_diagnose(args, &table),
        Commands::Benchmarks(args) => commands::benchmarks::run_benchmarks(args, &table),
        Commands::SimulateDso(args) => commands::benchmarks::run_simulate_dso(args),
        Commands::SimulateDpo(args) => commands::benchmarks::run_simulate_dpo(args),
        Commands::Extract(args) => commands::intake::run_extract(args),
        Commands::Version => {
            println!("growli {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
