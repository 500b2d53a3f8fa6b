//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod project;
mod run;

pub use project::ProjectCommands;
pub use run::RunCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use testrun_tracker::Tracker;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Browse projects and their test suites
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Launch and inspect test runs
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
}

/// Handle a CLI command
///
/// Builds the tracker from the global configuration and routes the command
/// to its handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let tracker =
        Tracker::from_config(&config.tracker_config()).context("Failed to set up the tracker")?;

    match command {
        Commands::Project { command } => project::handle_project_command(command, &tracker).await,
        Commands::Run { command } => run::handle_run_command(command, &tracker).await,
    }
}
