use crate::jira::models::{Issue, Worklog, total_time_spent};
use crate::worklog::duration::format_seconds;

// Context file layout, read by the coding assistant:
//
// # KEY: Summary
// **Type:** Bug | **Status:** In Progress | **Priority:** High | ...
// **Link:** https://company.atlassian.net/browse/KEY
//
// ## Time Tracking / ## Description / ## Comments / ## Worklogs

/// Generate an assistant-readable Markdown summary of an issue.
pub fn to_context_markdown(issue: &Issue, worklogs: &[Worklog], instance_url: &str) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}: {}\n\n", issue.key, issue.fields.summary));

    let mut metadata = Vec::new();
    if let Some(issue_type) = issue.issue_type() {
        metadata.push(format!("**Type:** {}", issue_type));
    }
    if let Some(status) = issue.status() {
        metadata.push(format!("**Status:** {}", status));
    }
    if let Some(priority) = issue.priority() {
        metadata.push(format!("**Priority:** {}", priority));
    }
    metadata.push(format!(
        "**Assignee:** {}",
        issue.assignee().unwrap_or("Unassigned")
    ));
    if let Some(reporter) = issue.reporter() {
        metadata.push(format!("**Reporter:** {}", reporter));
    }
    md.push_str(&format!("{}\n", metadata.join(" | ")));

    md.push_str(&format!(
        "**Link:** {}/browse/{}\n",
        instance_url.trim_end_matches('/'),
        issue.key
    ));

    if !issue.fields.labels.is_empty() {
        md.push_str(&format!("**Labels:** {}\n", issue.fields.labels.join(", ")));
    }

    if let Some(tt) = &issue.fields.time_tracking {
        let mut lines = Vec::new();
        if let Some(secs) = tt.original_estimate_seconds {
            lines.push(format!("- Original estimate: {}", format_seconds(secs)));
        }
        if let Some(secs) = tt.time_spent_seconds {
            lines.push(format!("- Time spent: {}", format_seconds(secs)));
        }
        if let Some(secs) = tt.remaining_estimate_seconds {
            lines.push(format!("- Remaining: {}", format_seconds(secs)));
        }
        if !lines.is_empty() {
            md.push_str("\n## Time Tracking\n\n");
            md.push_str(&lines.join("\n"));
            md.push('\n');
        }
    }

    md.push_str("\n## Description\n\n");
    match issue.fields.description.as_deref().map(strip_html_tags) {
        Some(desc) if !desc.is_empty() => md.push_str(&desc),
        _ => md.push_str("(No description)"),
    }
    md.push('\n');

    let comments = issue.comments();
    if !comments.is_empty() {
        md.push_str("\n## Comments\n");
        for comment in comments {
            let author = comment
                .author
                .as_ref()
                .map(|a| a.display_name.as_str())
                .unwrap_or("Unknown");
            match comment.created.as_deref() {
                Some(created) => md.push_str(&format!("\n### {} ({})\n\n", author, created)),
                None => md.push_str(&format!("\n### {}\n\n", author)),
            }
            md.push_str(&strip_html_tags(&comment.body));
            md.push('\n');
        }
    }

    if !worklogs.is_empty() {
        md.push_str("\n## Worklogs\n\n");
        for log in worklogs {
            let author = log
                .author
                .as_ref()
                .map(|a| a.display_name.as_str())
                .unwrap_or("Unknown");
            let mut line = format!("- {} by {}", format_seconds(log.time_spent_seconds), author);
            if let Some(started) = &log.started {
                line.push_str(&format!(" on {}", started));
            }
            if let Some(comment) = log.comment.as_deref().filter(|c| !c.trim().is_empty()) {
                line.push_str(&format!(": {}", comment.trim()));
            }
            md.push_str(&line);
            md.push('\n');
        }
        match total_time_spent(worklogs) {
            Some(total) => {
                md.push_str(&format!("\n**Total logged:** {}\n", format_seconds(total)))
            }
            None => md.push_str(&format!(
                "\n**Total logged:** more than {} seconds\n",
                u64::MAX
            )),
        }
    }

    md
}

/// Strip HTML tags from description (simple implementation)
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.trim().to_string()
}
