//! dailydo CLI - runs the dailyDo todo API server
//!
//! `dailydo serve` loads configuration from flags, the environment and an
//! optional `.env` file, prepares the database, and serves until Ctrl+C or
//! SIGTERM.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "dailydo",
    author,
    version,
    about = "dailyDo todo API server",
    long_about = "Serve the dailyDo todo API: create, list, fetch, update and delete \
                  todo items stored in PostgreSQL."
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces to an OTLP endpoint (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be populated
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
