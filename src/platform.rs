//! Cross-platform utilities for directory resolution and file operations.
//!
//! Context files are written where the editor and the assistant can pick
//! them up. The directory is resolved through a fallback chain so export
//! still works when the home directory is read-only.

use crate::config::CONFIG_DIR_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Get the context directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Configured `context.file_location`
/// 2. Home directory (~/.jira-worklog/context)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
///
/// Each directory is validated for write access before being selected.
pub fn context_dir(configured: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = configured {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(CONFIG_DIR_NAME).join("context");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        warn!(
            "cannot write to {}, trying fallback locations",
            dir.display()
        );
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("jira-worklog").join("context");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(".jira-context");
    ensure_writable(&dir).context(
        "Cannot create context directory in any location. \
         Check file permissions or set context.file_location in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
///
/// Creates the directory if it doesn't exist, then tests write access
/// by creating and removing a temporary file.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // Cleanup test file, ignore errors (file might be held by antivirus on Windows)
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// `DEMO-1` -> `DEMO-1.md`; anything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn context_file_name(issue_key: &str) -> String {
    let stem: String = issue_key
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.md", stem)
}

/// Write `markdown` to `<dir>/<KEY>.md`, replacing any previous export.
pub fn save_context_file(dir: &Path, issue_key: &str, markdown: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(context_file_name(issue_key));

    // Write to temp file then rename so readers never see a partial file
    let temp_path = path.with_extension("md.tmp");
    fs::write(&temp_path, markdown).context("Failed to write context file")?;
    fs::rename(&temp_path, &path).context("Failed to move context file into place")?;

    debug!(path = %path.display(), "saved context file");
    Ok(path)
}
