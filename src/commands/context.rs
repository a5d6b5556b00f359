use crate::OutputFormat;
use crate::commands::{print_json, require_issue_key};
use crate::jira::IssueTracker;
use crate::platform::{context_dir, save_context_file};
use crate::utils::markdown::to_context_markdown;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tracing::warn;

/// Export an issue as a Markdown context file for the coding assistant.
///
/// `output_dir` overrides the configured location for this call only.
pub fn export(
    tracker: &dyn IssueTracker,
    key: &str,
    configured_dir: Option<&PathBuf>,
    output_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let key = require_issue_key(key)?;
    let issue = tracker.get_issue(key)?;

    // Worklogs are extra context; an issue without access to them still exports
    let worklogs = match tracker.get_worklogs(&issue.key) {
        Ok(logs) => logs,
        Err(e) => {
            warn!("could not fetch worklogs for {}: {:#}", issue.key, e);
            Vec::new()
        }
    };

    let markdown = to_context_markdown(&issue, &worklogs, tracker.instance_url());

    let dir = context_dir(output_dir.as_ref().or(configured_dir))?;
    let path = save_context_file(&dir, &issue.key, &markdown)?;

    match format {
        OutputFormat::Text => println!(
            "✓ Context file created for {} at {}",
            issue.key,
            path.display()
        ),
        OutputFormat::Json => print_json(&json!({
            "key": issue.key,
            "path": path,
        }))?,
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::dummy::DummyTracker;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_markdown_file() {
        let mut tracker = DummyTracker::seeded();
        tracker.add_worklog("DEMO-1", 3600, Some("triage".into())).unwrap();
        let temp = TempDir::new().unwrap();

        let path = export(
            &tracker,
            "demo-1",
            None,
            Some(temp.path().to_path_buf()),
            OutputFormat::Text,
        )
        .unwrap();

        assert_eq!(path, temp.path().join("DEMO-1.md"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# DEMO-1: Login fails on Safari"));
        assert!(content.contains("**Link:** https://company.atlassian.net/browse/DEMO-1"));
        assert!(content.contains("- Time spent: 3h 30m"));
        assert!(content.contains("- 1h by John Doe"));
    }

    #[test]
    fn test_output_dir_overrides_configured_dir() {
        let tracker = DummyTracker::seeded();
        let configured = TempDir::new().unwrap();
        let explicit = TempDir::new().unwrap();
        let configured_path = configured.path().to_path_buf();

        let path = export(
            &tracker,
            "WEB-1",
            Some(&configured_path),
            Some(explicit.path().to_path_buf()),
            OutputFormat::Json,
        )
        .unwrap();

        assert!(path.starts_with(explicit.path()));
        assert!(!configured.path().join("WEB-1.md").exists());
    }
}
