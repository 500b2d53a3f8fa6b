//! Project command handlers
//!
//! Read-only catalog browsing: projects and the test suites they offer.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use testrun_tracker::Tracker;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List all projects
    List,
    /// List the test suites of a project
    Suites {
        /// Project name
        project: String,
    },
}

pub async fn handle_project_command(command: ProjectCommands, tracker: &Tracker) -> Result<()> {
    match command {
        ProjectCommands::List => list_projects(tracker).await,
        ProjectCommands::Suites { project } => list_suites(tracker, &project).await,
    }
}

async fn list_projects(tracker: &Tracker) -> Result<()> {
    let projects = tracker
        .list_projects()
        .await
        .context("Failed to load projects")?;

    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} project(s):", projects.len()).bold());
    println!();
    for project in projects {
        println!("  {} {}", "▸".cyan(), project.name.bold());
        println!("    {}", project.url.dimmed());
    }

    Ok(())
}

async fn list_suites(tracker: &Tracker, project: &str) -> Result<()> {
    let suites = tracker
        .list_test_suites(project)
        .await
        .context("Failed to load test suites")?;

    if suites.is_empty() {
        println!(
            "{}",
            format!("No test suites found for project {}.", project).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} test suite(s) in {}:", suites.len(), project).bold()
    );
    println!();
    for suite in suites {
        println!("  {} {}", "▸".cyan(), suite);
    }

    Ok(())
}
