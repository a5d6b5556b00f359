use crate::OutputFormat;
use crate::commands::{print_json, require_issue_key, truncate};
use crate::jira::IssueTracker;
use crate::jira::models::total_time_spent;
use crate::worklog::duration::{WorkDuration, format_seconds};
use anyhow::Result;
use tracing::info;

/// Log time against an issue. The duration is already validated by the caller.
pub fn log_work(
    tracker: &mut dyn IssueTracker,
    key: &str,
    time: WorkDuration,
    comment: Option<String>,
    dry_run: bool,
    format: OutputFormat,
) -> Result<()> {
    let key = require_issue_key(key)?;
    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    if dry_run {
        println!(
            "[DRY-RUN] Would log {} ({} seconds) to {}",
            time,
            time.as_secs(),
            key
        );
        if let Some(ref c) = comment {
            println!("[DRY-RUN] Comment: {}", c);
        }
        return Ok(());
    }

    let worklog = tracker.add_worklog(key, time.as_secs(), comment)?;
    info!(key, worklog_id = %worklog.id, seconds = worklog.time_spent_seconds, "worklog added");

    match format {
        OutputFormat::Text => println!(
            "✓ Logged {} to {} (Worklog ID: {})",
            time, key, worklog.id
        ),
        OutputFormat::Json => print_json(&worklog)?,
    }

    Ok(())
}

/// Show worklogs of an issue with a total
pub fn worklogs(tracker: &dyn IssueTracker, key: &str, format: OutputFormat) -> Result<()> {
    let key = require_issue_key(key)?;
    let logs = tracker.get_worklogs(key)?;

    if format == OutputFormat::Json {
        return print_json(&logs);
    }

    if logs.is_empty() {
        println!("No worklogs found for {}.", key);
        return Ok(());
    }

    println!("Worklogs for {}:", key);
    println!(
        "{:<10} {:<20} {:<40} {:<12}",
        "ID", "Author", "Comment", "Time"
    );
    println!("{}", "-".repeat(85));

    for log in &logs {
        let author = log
            .author
            .as_ref()
            .map(|a| a.display_name.as_str())
            .unwrap_or("Unknown");
        let comment = log.comment.as_deref().unwrap_or("(no comment)");

        println!(
            "{:<10} {:<20} {:<40} {:<12}",
            log.id,
            truncate(author, 20),
            truncate(comment, 40),
            format_seconds(log.time_spent_seconds)
        );
    }

    match total_time_spent(&logs) {
        Some(total) => println!(
            "\nTotal: {} ({} entries)",
            format_seconds(total),
            logs.len()
        ),
        None => println!(
            "\nTotal: more than {} seconds ({} entries)",
            u64::MAX,
            logs.len()
        ),
    }

    Ok(())
}
