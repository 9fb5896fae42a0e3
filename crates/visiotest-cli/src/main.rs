//! visiotest CLI — interactive vision self-assessment in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "visiotest",
    version,
    about = "Vision self-assessment: acuity, contrast and color tests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive test session
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for stimulus generation (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Pause after each test before returning to the menu, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Directory for session snapshots and exports
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a saved session snapshot
    Report {
        /// Session snapshot JSON
        #[arg(long)]
        session: PathBuf,

        /// Output format: text, json, html, export
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file (json, html) or directory (export)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter visiotest.toml
    Init,
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("visiotest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            seed,
            delay_ms,
            output,
        } => commands::run::execute(config, seed, delay_ms, output).await,
        Commands::Report {
            session,
            format,
            output,
        } => commands::report::execute(session, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
