pub mod client;
pub mod dummy;
pub mod models;

use crate::config::Config;
use anyhow::Result;
use models::{
    Comment, CreatedIssue, CreatedRemoteLink, Issue, NewIssue, RemoteLink, Transition, User,
    Worklog,
};

/// Operations the commands need from an issue tracker.
///
/// Implemented by the live REST client and by the in-memory dummy tracker.
pub trait IssueTracker {
    /// Base URL used to build browse links.
    fn instance_url(&self) -> &str;

    fn current_user(&self) -> Result<User>;

    fn get_issue(&self, key: &str) -> Result<Issue>;

    fn get_worklogs(&self, key: &str) -> Result<Vec<Worklog>>;

    fn add_worklog(&mut self, key: &str, seconds: u64, comment: Option<String>) -> Result<Worklog>;

    fn add_comment(&mut self, key: &str, body: &str) -> Result<Comment>;

    /// Transitions allowed from the issue's current status.
    fn get_transitions(&self, key: &str) -> Result<Vec<Transition>>;

    fn transition_issue(&mut self, key: &str, transition_id: &str) -> Result<()>;

    fn create_issue(&mut self, issue: &NewIssue) -> Result<CreatedIssue>;

    fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>>;

    fn create_remote_link(
        &mut self,
        key: &str,
        url: &str,
        title: &str,
    ) -> Result<CreatedRemoteLink>;
}

/// Pick the tracker the config asks for.
pub fn connect(config: &Config) -> Result<Box<dyn IssueTracker>> {
    if config.use_dummy_data {
        tracing::info!("using dummy issue data");
        return Ok(Box::new(dummy::DummyTracker::seeded()));
    }

    config.require_connection()?;
    let token = config.get_api_token()?;
    let client = client::JiraClient::new(&config.jira.url, &config.jira.email, &token)?;
    Ok(Box::new(client))
}
