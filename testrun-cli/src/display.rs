//! Terminal rendering of runs and status records

use colored::*;
use testrun_core::domain::run::{StatusCode, StatusRecord, TrackedRun};
use testrun_core::dto::run::StatusReport;

/// Colorize a run status for display
pub fn colorize_status(status: &StatusCode) -> ColoredString {
    let status_str = status.to_string();
    match status {
        StatusCode::Queued => status_str.yellow(),
        StatusCode::Running => status_str.cyan(),
        StatusCode::Done => status_str.green(),
        StatusCode::Failed => status_str.red(),
        StatusCode::Unknown(_) => status_str.magenta(),
    }
}

/// Human summary of the advisory progress fields, if any are set
pub fn describe_progress(record: &StatusRecord) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(step) = &record.step_name {
        parts.push(step.clone());
    }
    if let Some(total) = record.total_steps {
        parts.push(format!("{} step(s)", total));
    }
    if let Some(progress) = record.progress {
        parts.push(format!("{}%", progress));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// One line per status change while watching
pub fn print_status_change(run: &TrackedRun) {
    let record = &run.record;
    let mut line = format!(
        "{} {} {} [{}] {}",
        run.updated_at.format("%H:%M:%S").to_string().dimmed(),
        "▸".cyan(),
        run.run.run_id.to_string().bold(),
        run.run.suite_id,
        colorize_status(&record.status)
    );

    if let Some(progress) = describe_progress(record) {
        line.push_str(&format!(" {}", progress.dimmed()));
    }

    println!("{}", line);

    if let Some(report) = &record.report_file {
        println!("    Report: {}", report.underline());
    }
}

/// Final per-run summary
pub fn print_run_summary(run: &TrackedRun) {
    println!("  {} Run {}", "▸".cyan(), run.run.run_id.to_string().bold());
    println!("    Project:  {}", run.run.project_name);
    println!("    Suite:    {}", run.run.suite_id);
    println!("    Status:   {}", colorize_status(&run.record.status));
    println!(
        "    Launched: {}",
        run.run
            .launched_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if let Some(report) = &run.record.report_file {
        println!("    Report:   {}", report.underline());
    }
    println!();
}

/// Details of a one-off status check
pub fn print_report(report: &StatusReport) {
    println!("{}", "Run Status:".bold());
    println!("  ID:         {}", report.id_test.cyan());
    println!("  Status:     {}", colorize_status(&report.status));
    println!("  Checkpoint: {}", report.checkpoint);

    if let Some(step) = &report.step_name {
        println!("  Step:       {}", step);
    }
    if let Some(total) = report.total_steps {
        println!("  Steps:      {}", total);
    }
    if let Some(progress) = report.progress {
        println!("  Progress:   {}%", progress);
    }
    if let Some(file) = &report.report_file {
        println!("  Report:     {}", file.underline());
    }
}
