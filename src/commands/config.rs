use crate::config::Config;
use anyhow::{Context, Result};

/// Print the config as TOML, with the API token masked.
pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(&redacted(config)).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    println!("{}", lookup(key, config)?);
    Ok(())
}

/// Resolve a dotted key such as `jira.url` against the config.
pub fn lookup(key: &str, config: &Config) -> Result<String> {
    let value = serde_json::to_value(redacted(config)).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }

    Ok(match current {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        v => v.to_string(),
    })
}

fn redacted(config: &Config) -> Config {
    let mut config = config.clone();
    if config.jira.api_token.is_some() {
        config.jira.api_token = Some("********".to_string());
    }
    config
}
