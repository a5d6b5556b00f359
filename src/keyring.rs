use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_JIRA: &str = "jira-worklog-api-token";

/// Store a credential in the system keyring
pub fn store_credential(service: &str, username: &str, password: &str) -> Result<()> {
    let entry = Entry::new(service, username).context("Failed to create keyring entry")?;

    entry
        .set_password(password)
        .context("Failed to store credential in keyring")?;

    Ok(())
}

/// Retrieve a credential from the system keyring
pub fn get_credential(service: &str, username: &str) -> Result<String> {
    let entry = Entry::new(service, username).context("Failed to create keyring entry")?;

    entry
        .get_password()
        .context("Failed to retrieve credential from keyring")
}

/// Entries are keyed by account email; an empty email maps to "default".
fn account(email: &str) -> &str {
    if email.is_empty() { "default" } else { email }
}

pub fn store_api_token(email: &str, token: &str) -> Result<()> {
    store_credential(SERVICE_JIRA, account(email), token)
}

pub fn get_api_token(email: &str) -> Result<String> {
    get_credential(SERVICE_JIRA, account(email))
}
