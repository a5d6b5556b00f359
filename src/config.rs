use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;
use tracing::{info, warn};

/// Directory under `$HOME` holding config and default context files.
pub const CONFIG_DIR_NAME: &str = ".jira-worklog";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub context: ContextConfig,
    /// Serve fixture issues from memory instead of calling the API
    #[serde(default)]
    pub use_dummy_data: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraConfig {
    /// Instance URL, e.g. https://company.atlassian.net
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub email: String,
    pub api_token: Option<String>, // Can be optional if loading from keyring
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,
}

fn default_use_keyring() -> bool {
    true
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            email: String::new(),
            api_token: None,
            use_keyring: default_use_keyring(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ContextConfig {
    /// Where exported context files go. Falls back to ~/.jira-worklog/context
    pub file_location: Option<PathBuf>,
}

impl JiraConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.url.is_empty()
            && !(self.url.starts_with("http://") || self.url.starts_with("https://"))
        {
            anyhow::bail!(
                "Invalid Jira URL '{}', expected it to start with http:// or https://",
                self.url
            );
        }

        if !self.email.is_empty() && !self.email.contains('@') {
            anyhow::bail!("Invalid Jira email '{}'", self.email);
        }

        Ok(())
    }
}

impl Config {
    /// Get the API token from keyring or config (with migration)
    pub fn get_api_token(&self) -> Result<String> {
        if self.jira.use_keyring {
            match crate::keyring::get_api_token(&self.jira.email) {
                Ok(token) => return Ok(token),
                Err(e) => warn!("keyring lookup failed: {:#}", e),
            }
        }

        // Fall back to config file (legacy)
        if let Some(token) = &self.jira.api_token {
            return Ok(token.clone());
        }

        anyhow::bail!(
            "Jira API token not found. Set jira.api_token in ~/{}/config.toml",
            CONFIG_DIR_NAME
        )
    }

    /// Check that the live API can be reached with this config.
    pub fn require_connection(&self) -> Result<()> {
        if self.use_dummy_data {
            return Ok(());
        }
        if self.jira.url.is_empty() {
            anyhow::bail!(
                "Jira URL not set. Add jira.url to ~/{}/config.toml",
                CONFIG_DIR_NAME
            );
        }
        if self.jira.email.is_empty() {
            anyhow::bail!(
                "Jira email not set. Add jira.email to ~/{}/config.toml",
                CONFIG_DIR_NAME
            );
        }
        Ok(())
    }

    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        self.jira.validate()?;
        Ok(())
    }

    /// Migrate plain-text API token to keyring
    pub fn migrate_credentials(&mut self) -> Result<bool> {
        if !self.jira.use_keyring {
            return Ok(false);
        }

        let mut migrated = false;

        if let Some(token) = &self.jira.api_token {
            crate::keyring::store_api_token(&self.jira.email, token)
                .context("Failed to store API token in keyring")?;

            // Clear from config
            self.jira.api_token = None;
            migrated = true;
        }

        Ok(migrated)
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(home::home_dir()
        .context("Could not find home directory")?
        .join(CONFIG_DIR_NAME))
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

pub fn load() -> Result<Config> {
    let config_path = config_dir()?.join("config.toml");

    let mut config = load_from_path(&config_path)?;

    config.validate()?;

    // Auto-migrate credentials on load if needed
    if config.migrate_credentials()? {
        info!("migrated API token to secure storage");
        save_to_path(&config, &config_path)?;
    }

    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
