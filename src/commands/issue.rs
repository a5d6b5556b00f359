use crate::OutputFormat;
use crate::commands::{print_json, require_issue_key};
use crate::jira::IssueTracker;
use crate::jira::models::NewIssue;
use crate::utils::markdown::strip_html_tags;
use crate::worklog::duration::format_seconds;
use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

const SUBTASK_TYPE: &str = "Sub-task";

pub fn whoami(tracker: &dyn IssueTracker, format: OutputFormat) -> Result<()> {
    let user = tracker.current_user()?;

    match format {
        OutputFormat::Text => {
            println!("Connected to {}", tracker.instance_url());
            match &user.email_address {
                Some(email) => println!("Signed in as {} <{}>", user.display_name, email),
                None => println!("Signed in as {}", user.display_name),
            }
        }
        OutputFormat::Json => print_json(&user)?,
    }

    Ok(())
}

pub fn show(tracker: &dyn IssueTracker, key: &str, format: OutputFormat) -> Result<()> {
    let key = require_issue_key(key)?;
    let issue = tracker.get_issue(key)?;

    if format == OutputFormat::Json {
        return print_json(&issue);
    }

    println!("{}: {}", issue.key, issue.fields.summary);
    println!("Type: {}", issue.issue_type().unwrap_or("Unknown"));
    println!("Status: {}", issue.status().unwrap_or("Unknown"));
    println!("Priority: {}", issue.priority().unwrap_or("None"));
    println!("Assignee: {}", issue.assignee().unwrap_or("Unassigned"));
    if let Some(parent) = issue.parent_key() {
        println!("Parent: {}", parent);
    }

    if let Some(tt) = &issue.fields.time_tracking {
        let show_secs = |secs: Option<u64>| {
            secs.map(format_seconds)
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "Time: {} spent, {} remaining (estimate {})",
            show_secs(tt.time_spent_seconds),
            show_secs(tt.remaining_estimate_seconds),
            show_secs(tt.original_estimate_seconds)
        );
    }

    println!("\nDescription:");
    match issue.fields.description.as_deref() {
        Some(desc) => println!("{}", strip_html_tags(desc)),
        None => println!("(No description)"),
    }

    let comments = issue.comments();
    if !comments.is_empty() {
        println!("\nComments ({}):", comments.len());
        for comment in comments {
            let author = comment
                .author
                .as_ref()
                .map(|a| a.display_name.as_str())
                .unwrap_or("Unknown");
            println!("  - {}: {}", author, strip_html_tags(&comment.body));
        }
    }

    Ok(())
}

pub fn comment(
    tracker: &mut dyn IssueTracker,
    key: &str,
    body: &str,
    format: OutputFormat,
) -> Result<()> {
    let key = require_issue_key(key)?;
    let body = body.trim();
    if body.is_empty() {
        anyhow::bail!("Comment text is required and cannot be empty");
    }

    let comment = tracker.add_comment(key, body)?;

    match format {
        OutputFormat::Text => println!(
            "✓ Added comment to {} (Comment ID: {})",
            key, comment.id
        ),
        OutputFormat::Json => print_json(&comment)?,
    }

    Ok(())
}

/// Move an issue to the status named `status` (case-insensitive) through
/// one of its available transitions.
pub fn update_status(
    tracker: &mut dyn IssueTracker,
    key: &str,
    status: &str,
    format: OutputFormat,
) -> Result<()> {
    let key = require_issue_key(key)?;
    let status = status.trim();
    if status.is_empty() {
        anyhow::bail!("Status is required and cannot be empty");
    }

    let transitions = tracker.get_transitions(key)?;
    let Some(transition) = transitions
        .iter()
        .find(|t| t.to.name.eq_ignore_ascii_case(status))
    else {
        let available: Vec<&str> = transitions.iter().map(|t| t.to.name.as_str()).collect();
        anyhow::bail!(
            "Cannot transition {} to \"{}\". Available statuses: {}",
            key,
            status,
            available.join(", ")
        );
    };

    tracker.transition_issue(key, &transition.id)?;
    info!(key, transition_id = %transition.id, status = %transition.to.name, "issue transitioned");

    match format {
        OutputFormat::Text => println!(
            "✓ Updated {} status to \"{}\"",
            key, transition.to.name
        ),
        OutputFormat::Json => print_json(&json!({
            "key": key,
            "status": transition.to.name,
            "transition_id": transition.id,
        }))?,
    }

    Ok(())
}

/// Create a subtask under `parent_key`, in the parent's project.
pub fn create_subtask(
    tracker: &mut dyn IssueTracker,
    parent_key: &str,
    summary: &str,
    description: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let parent_key = require_issue_key(parent_key)?;
    let summary = summary.trim();
    if summary.is_empty() {
        anyhow::bail!("Summary is required and cannot be empty");
    }

    let parent = tracker.get_issue(parent_key).with_context(|| {
        format!(
            "Parent issue {} not found or you do not have permission to view it",
            parent_key
        )
    })?;

    let new_issue = NewIssue {
        project_key: parent.project_key().to_string(),
        summary: summary.to_string(),
        description: description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        issue_type: SUBTASK_TYPE.to_string(),
        parent_key: Some(parent.key.clone()),
    };

    let created = match tracker.create_issue(&new_issue) {
        Ok(created) => created,
        Err(e) => {
            let message = format!("{:#}", e);
            if message.contains(SUBTASK_TYPE) || message.contains("issue type") {
                return Err(e.context(format!(
                    "The \"{}\" issue type may not be available in project {}",
                    SUBTASK_TYPE, new_issue.project_key
                )));
            }
            return Err(e);
        }
    };
    info!(key = %created.key, parent = %parent.key, "subtask created");

    match format {
        OutputFormat::Text => println!(
            "✓ Created subtask {} under {}",
            created.key, parent.key
        ),
        OutputFormat::Json => print_json(&created)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::dummy::DummyTracker;

    #[test]
    fn test_comment_rejects_blank_body() {
        let mut tracker = DummyTracker::seeded();
        let result = comment(&mut tracker, "DEMO-1", "   ", OutputFormat::Text);
        assert!(result.is_err());
        assert_eq!(tracker.get_issue("DEMO-1").unwrap().comments().len(), 1);
    }

    #[test]
    fn test_comment_is_added() {
        let mut tracker = DummyTracker::seeded();
        comment(&mut tracker, "DEMO-1", "Fixed in build 42", OutputFormat::Json).unwrap();

        let issue = tracker.get_issue("DEMO-1").unwrap();
        assert_eq!(issue.comments().last().unwrap().body, "Fixed in build 42");
    }

    #[test]
    fn test_show_unknown_issue_fails() {
        let tracker = DummyTracker::seeded();
        assert!(show(&tracker, "ZZZ-1", OutputFormat::Text).is_err());
    }

    #[test]
    fn test_update_status_matches_name_case_insensitively() {
        let mut tracker = DummyTracker::seeded();
        update_status(&mut tracker, "DEMO-1", "  in review ", OutputFormat::Text).unwrap();

        assert_eq!(tracker.get_issue("DEMO-1").unwrap().status(), Some("In Review"));
    }

    #[test]
    fn test_update_status_lists_available_statuses() {
        let mut tracker = DummyTracker::seeded();
        let err = update_status(&mut tracker, "DEMO-1", "Done", OutputFormat::Text).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot transition DEMO-1 to \"Done\". Available statuses: In Review, Blocked, To Do"
        );
        assert_eq!(tracker.get_issue("DEMO-1").unwrap().status(), Some("In Progress"));
    }

    #[test]
    fn test_update_status_rejects_blank_input() {
        let mut tracker = DummyTracker::seeded();

        let err = update_status(&mut tracker, "DEMO-1", "  ", OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Status is required"));

        let err = update_status(&mut tracker, " ", "Done", OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Issue key is required"));
    }

    #[test]
    fn test_create_subtask_uses_parent_project() {
        let mut tracker = DummyTracker::seeded();
        create_subtask(
            &mut tracker,
            "web-1",
            " Purge stale cache keys ",
            Some("   ".to_string()),
            OutputFormat::Json,
        )
        .unwrap();

        let subtask = tracker.get_issue("WEB-2").unwrap();
        assert_eq!(subtask.fields.summary, "Purge stale cache keys");
        assert_eq!(subtask.parent_key(), Some("WEB-1"));
        assert_eq!(subtask.issue_type(), Some("Sub-task"));
        assert_eq!(subtask.fields.description, None);
    }

    #[test]
    fn test_create_subtask_rejects_blank_summary_and_missing_parent() {
        let mut tracker = DummyTracker::seeded();

        let err = create_subtask(&mut tracker, "DEMO-1", "", None, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Summary is required"));

        let err =
            create_subtask(&mut tracker, "DEMO-42", "Child", None, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().starts_with("Parent issue DEMO-42 not found"));
        assert_eq!(tracker.issues().len(), 4);
    }
}
