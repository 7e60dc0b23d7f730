//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod describe;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Click a point on a map, read about the place
#[derive(Parser)]
#[command(name = "geo-explorer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Describe a location once and exit
    Describe(describe::DescribeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show credential and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args).await
        }
        Commands::Describe(args) => {
            init_logging("warn");
            describe::run(args).await
        }
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => {
            init_logging("warn");
            status::run(args).await
        }
    }
}

/// Install the tracing subscriber; `RUST_LOG` wins over `default`
fn init_logging(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}
