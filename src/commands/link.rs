use crate::OutputFormat;
use crate::commands::{print_json, require_issue_key};
use crate::jira::IssueTracker;
use anyhow::Result;
use reqwest::Url;
use serde_json::json;
use tracing::info;

const EXPECTED_PR_URL: &str = "https://github.com/owner/repo/pull/123";

/// `https://github.com/<owner>/<repo>/pull/<n>`
pub fn is_github_pr_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.host_str() == Some("github.com") && url.contains("/pull/"),
        Err(_) => false,
    }
}

/// `PR #123 - owner/repo`, or the URL itself when it has no PR number.
pub fn pr_link_title(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(segments) = parsed.path_segments() else {
        return url.to_string();
    };

    let segments: Vec<&str> = segments.collect();
    match segments.iter().position(|s| *s == "pull") {
        Some(idx) if idx + 1 < segments.len() => {
            format!("PR #{} - {}", segments[idx + 1], segments[..idx].join("/"))
        }
        _ => url.to_string(),
    }
}

/// Attach a GitHub pull request to an issue as a remote link.
///
/// A PR that is already linked is reported and left alone.
pub fn link_pr(
    tracker: &mut dyn IssueTracker,
    key: &str,
    pr_url: &str,
    title: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let key = require_issue_key(key)?;
    let pr_url = pr_url.trim();
    if pr_url.is_empty() {
        anyhow::bail!("PR URL is required and cannot be empty");
    }
    if !is_github_pr_url(pr_url) {
        anyhow::bail!(
            "The provided URL does not appear to be a valid GitHub Pull Request URL. Expected format: {}",
            EXPECTED_PR_URL
        );
    }

    let existing = tracker.get_remote_links(key)?;
    if existing.iter().any(|link| link.url() == Some(pr_url)) {
        match format {
            OutputFormat::Text => println!("The PR is already linked to {}.", key),
            OutputFormat::Json => print_json(&json!({
                "key": key,
                "url": pr_url,
                "linked": false,
                "already_linked": true,
            }))?,
        }
        return Ok(());
    }

    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| pr_link_title(pr_url));

    let created = tracker.create_remote_link(key, pr_url, &title)?;
    info!(key, link_id = created.id, "pull request linked");

    match format {
        OutputFormat::Text => println!("✓ Linked {} to {}", title, key),
        OutputFormat::Json => print_json(&json!({
            "key": key,
            "url": pr_url,
            "title": title,
            "id": created.id,
            "linked": true,
            "already_linked": false,
        }))?,
    }

    Ok(())
}
