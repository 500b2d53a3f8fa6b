//! Testrun CLI
//!
//! Command-line interface for launching remote test suites and watching
//! them until they finish.

mod commands;
mod config;
mod display;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "testrun")]
#[command(about = "Launch remote test suites and track them to completion", long_about = None)]
struct Cli {
    /// Test runner gateway URL
    #[arg(
        long,
        env = "TESTRUN_GATEWAY_URL",
        default_value = "http://localhost/service-test-runner"
    )]
    gateway_url: String,

    /// Status polling interval in milliseconds
    #[arg(long, env = "TESTRUN_POLL_INTERVAL_MS", default_value_t = 2000)]
    poll_interval_ms: u64,

    /// Timeout for a single gateway request in seconds
    #[arg(long, env = "TESTRUN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "testrun_cli=info,testrun_tracker=warn,testrun_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        gateway_url: cli.gateway_url,
        poll_interval_ms: cli.poll_interval_ms,
        request_timeout_secs: cli.request_timeout_secs,
    };

    handle_command(cli.command, &config).await
}
