pub mod config;
pub mod context;
pub mod duration;
pub mod issue;
pub mod link;
pub mod worklog;

use anyhow::Result;
use serde::Serialize;

/// Trimmed issue key, or an error when blank.
pub fn require_issue_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Issue key is required and cannot be empty");
    }
    Ok(key)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shorten to `max` characters, ending in "..." when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
