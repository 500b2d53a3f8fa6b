//! Run command handlers
//!
//! Launches test suites and follows them until every run reaches a terminal
//! status, or checks a single run once.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use testrun_core::domain::run::{RunId, StatusCode};
use testrun_tracker::{RegistryEvent, Tracker};
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::display::{print_report, print_run_summary, print_status_change};

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// Launch one run per suite and watch them to completion
    Launch {
        /// Project the suites belong to
        #[arg(short, long)]
        project: String,

        /// Test suite to run (repeat for several)
        #[arg(short, long = "suite", required = true)]
        suites: Vec<String>,

        /// Print the run ids and exit without watching
        #[arg(long)]
        detach: bool,
    },
    /// Check the status of a run once
    Status {
        /// Run id returned at launch
        id: String,

        /// Print the raw gateway reply as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn handle_run_command(command: RunCommands, tracker: &Tracker) -> Result<()> {
    match command {
        RunCommands::Launch {
            project,
            suites,
            detach,
        } => launch_runs(tracker, &project, &suites, detach).await,
        RunCommands::Status { id, json } => show_status(tracker, &id, json).await,
    }
}

async fn launch_runs(tracker: &Tracker, project: &str, suites: &[String], detach: bool) -> Result<()> {
    let mut launched = Vec::new();
    let mut launch_failures = 0;

    for suite in suites {
        match tracker.launch_run(project, suite).await {
            Ok(run_id) => {
                println!(
                    "{} Launched {} of {} as {}",
                    "✓".green(),
                    suite.bold(),
                    project,
                    run_id.to_string().cyan()
                );
                launched.push(run_id);
            }
            Err(e) => {
                println!("{} {}", "✗".red(), e.to_string().red());
                launch_failures += 1;
            }
        }
    }

    if launched.is_empty() {
        bail!("No run could be launched");
    }

    if detach {
        println!();
        println!(
            "{}",
            "Detached. Use `testrun run status <id>` to check on a run.".dimmed()
        );
        return finish(launch_failures, 0);
    }

    println!();
    println!(
        "{}",
        format!(
            "Watching {} run(s), polling every {:?}...",
            launched.len(),
            tracker.poll_interval()
        )
        .dimmed()
    );

    watch(tracker, &launched).await?;

    println!();
    println!("{}", "Summary:".bold());
    let mut failed = 0;
    for run_id in &launched {
        if let Some(run) = tracker.get(run_id) {
            if run.record.status == StatusCode::Failed {
                failed += 1;
            }
            print_run_summary(&run);
        }
    }

    finish(launch_failures, failed)
}

/// Polls until every launched run is terminal, printing each change
async fn watch(tracker: &Tracker, launched: &[RunId]) -> Result<()> {
    let mut events = tracker.subscribe();
    tracker.start();

    let all_terminal = |tracker: &Tracker| {
        launched.iter().all(|id| {
            tracker
                .get(id)
                .is_none_or(|run| run.record.is_terminal())
        })
    };

    while !all_terminal(tracker) {
        tokio::select! {
            event = events.recv() => match event {
                Ok(RegistryEvent::Updated { run_id, .. }) => {
                    if let Some(run) = tracker.get(&run_id) {
                        print_status_change(&run);
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Missed {} status notification(s), resyncing", skipped);
                    for run in tracker.runs() {
                        print_status_change(&run);
                    }
                }
                Err(RecvError::Closed) => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                tracker.stop().await;
                bail!("Interrupted; runs keep executing remotely");
            }
        }
    }

    tracker.stop().await;
    Ok(())
}

fn finish(launch_failures: usize, run_failures: usize) -> Result<()> {
    match (launch_failures, run_failures) {
        (0, 0) => Ok(()),
        (0, failed) => bail!("{} run(s) failed", failed),
        (launches, 0) => bail!("{} launch(es) failed", launches),
        (launches, failed) => bail!("{} launch(es) and {} run(s) failed", launches, failed),
    }
}

async fn show_status(tracker: &Tracker, id: &str, json: bool) -> Result<()> {
    let run_id = RunId::from(id);
    let report = tracker
        .check_status(&run_id)
        .await
        .with_context(|| format!("Failed to check status of run {}", run_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_outcomes() {
        assert!(finish(0, 0).is_ok());
        assert_eq!(finish(0, 2).unwrap_err().to_string(), "2 run(s) failed");
        assert_eq!(finish(1, 0).unwrap_err().to_string(), "1 launch(es) failed");
        assert_eq!(
            finish(1, 1).unwrap_err().to_string(),
            "1 launch(es) and 1 run(s) failed"
        );
    }
}
