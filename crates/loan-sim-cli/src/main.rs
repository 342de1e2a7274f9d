mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::loan::{PaymentArgs, ScheduleArgs};
use commands::scenarios::ScenariosArgs;
use commands::simulation::{RequestArgs, SimulateArgs};

/// Loan simulation and amortization schedules
#[derive(Parser)]
#[command(
    name = "loansim",
    version,
    about = "Loan simulation and amortization schedules",
    long_about = "A CLI for simulating vehicle loans with decimal precision. Computes \
                  level monthly payments, full amortization schedules, comparison \
                  scenarios, principal bounds checks and affordability verdicts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly payment for a principal, rate and term
    Payment(PaymentArgs),
    /// Full amortization schedule
    Schedule(ScheduleArgs),
    /// The three standard comparison scenarios for a vehicle and product
    Scenarios(ScenariosArgs),
    /// Replay a selection and a list of field edits, print the final state
    Simulate(SimulateArgs),
    /// Answer a simulation request with comparison scenarios
    Request(RequestArgs),
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

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Request(args) => commands::simulation::run_request(args),
        Commands::Version => {
            println!("loansim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
