use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// TLS Adoption Statistics
#[derive(Parser)]
#[command(name = "tls-stats")]
#[command(about = "Estimate TLS protocol, cipher suite and curve support among web visitors")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the current report, recomputing it when missing or stale
    Report(commands::report::ReportCommand),
    /// Recompute from today's local datasets with join diagnostics
    Analyse(commands::analyse::AnalyseCommand),
    /// Download today's usage and capability datasets
    Fetch(commands::fetch::FetchCommand),
    /// Print the effective configuration as TOML
    Config(commands::config::ConfigCommand),
}

pub async fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report(command) => command.run().await,
        Commands::Analyse(command) => command.run(),
        Commands::Fetch(command) => command.run().await,
        Commands::Config(command) => command.run(),
    }
}
