use crate::error::JiraError;
use crate::jira::IssueTracker;
use crate::jira::models::{
    AddCommentRequest, AddWorklogRequest, Comment, CreateIssueRequest, CreateRemoteLinkRequest,
    CreatedIssue, CreatedRemoteLink, Issue, NewIssue, RemoteLink, RemoteLinkObject, Transition,
    TransitionId, TransitionPage, TransitionRequest, User, Worklog, WorklogPage, jira_timestamp,
};
use anyhow::{Context, Result};
use base64::prelude::*;
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JiraClient {
    client: Client,
    base_url: String, // https://company.atlassian.net
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(instance_url: &str, email: &str, api_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: instance_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Helper for testing to override base URL (e.g. wiremock)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn instance_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/rest/api/2{}", self.base_url, endpoint)
    }

    fn auth_header(&self) -> String {
        let val = format!("{}:{}", self.email, self.api_token);
        format!("Basic {}", BASE64_STANDARD.encode(val))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .map_err(JiraError::Network)?;

        check_status(response)
    }

    /// `GET /myself`, mapping a 401 to a credentials hint.
    pub fn test_connection(&self) -> Result<User> {
        match self.get_current_user() {
            Ok(user) => Ok(user),
            Err(e) if matches!(e.downcast_ref::<JiraError>(), Some(JiraError::Authentication(_))) => {
                Err(JiraError::Authentication(
                    "Invalid credentials. Please check your email and API token.".to_string(),
                )
                .into())
            }
            Err(e) => Err(e),
        }
    }

    pub fn get_current_user(&self) -> Result<User> {
        let url = self.api_url("/myself");
        debug!(%url, "fetching current user");

        let response = self.send(self.client.get(&url))?;

        response
            .json::<User>()
            .context("Failed to parse user response")
    }

    pub fn get_issue(&self, key: &str) -> Result<Issue> {
        let url = self.api_url(&format!("/issue/{}", key));
        debug!(%url, "fetching issue");

        let response = self.send(self.client.get(&url))?;

        response
            .json::<Issue>()
            .context("Failed to parse Issue JSON response")
    }

    pub fn add_comment(&self, key: &str, body: &str) -> Result<Comment> {
        let url = self.api_url(&format!("/issue/{}/comment", key));
        debug!(%url, "adding comment");

        let request_body = AddCommentRequest {
            body: body.to_string(),
        };

        let response = self.send(
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&request_body),
        )?;

        response
            .json::<Comment>()
            .context("Failed to parse Comment response")
    }

    /// Log `seconds` of work against an issue, started now.
    pub fn add_worklog(
        &self,
        key: &str,
        seconds: u64,
        comment: Option<String>,
    ) -> Result<Worklog> {
        let url = self.api_url(&format!("/issue/{}/worklog", key));
        debug!(%url, seconds, "adding worklog");

        let request_body = AddWorklogRequest {
            time_spent_seconds: seconds,
            started: jira_timestamp(Utc::now()),
            comment,
        };

        let response = self.send(
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&request_body),
        )?;

        response
            .json::<Worklog>()
            .context("Failed to parse Worklog response")
    }

    pub fn get_worklogs(&self, key: &str) -> Result<Vec<Worklog>> {
        let url = self.api_url(&format!("/issue/{}/worklog", key));
        debug!(%url, "fetching worklogs");

        let response = self.send(self.client.get(&url))?;

        let page = response
            .json::<WorklogPage>()
            .context("Failed to parse worklogs response")?;

        Ok(page.worklogs)
    }

    pub fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let url = self.api_url(&format!("/issue/{}/transitions", key));
        debug!(%url, "fetching transitions");

        let response = self.send(self.client.get(&url))?;

        let page = response
            .json::<TransitionPage>()
            .context("Failed to parse transitions response")?;

        Ok(page.transitions)
    }

    /// Responds `204 No Content` on success.
    pub fn transition_issue(&self, key: &str, transition_id: &str) -> Result<()> {
        let url = self.api_url(&format!("/issue/{}/transitions", key));
        debug!(%url, transition_id, "transitioning issue");

        let request_body = TransitionRequest {
            transition: TransitionId {
                id: transition_id.to_string(),
            },
        };

        self.send(
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&request_body),
        )?;

        Ok(())
    }

    pub fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        let url = self.api_url("/issue");
        debug!(%url, project = %issue.project_key, "creating issue");

        let response = self.send(
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&CreateIssueRequest::from(issue)),
        )?;

        response
            .json::<CreatedIssue>()
            .context("Failed to parse create issue response")
    }

    pub fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>> {
        let url = self.api_url(&format!("/issue/{}/remotelink", key));
        debug!(%url, "fetching remote links");

        let response = self.send(self.client.get(&url))?;

        response
            .json::<Vec<RemoteLink>>()
            .context("Failed to parse remote links response")
    }

    pub fn create_remote_link(
        &self,
        key: &str,
        link_url: &str,
        title: &str,
    ) -> Result<CreatedRemoteLink> {
        let url = self.api_url(&format!("/issue/{}/remotelink", key));
        debug!(%url, link_url, "creating remote link");

        let request_body = CreateRemoteLinkRequest {
            object: RemoteLinkObject {
                url: link_url.to_string(),
                title: title.to_string(),
            },
        };

        let response = self.send(
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&request_body),
        )?;

        response
            .json::<CreatedRemoteLink>()
            .context("Failed to parse remote link response")
    }
}

impl IssueTracker for JiraClient {
    fn instance_url(&self) -> &str {
        JiraClient::instance_url(self)
    }

    fn current_user(&self) -> Result<User> {
        self.test_connection()
    }

    fn get_issue(&self, key: &str) -> Result<Issue> {
        JiraClient::get_issue(self, key)
    }

    fn get_worklogs(&self, key: &str) -> Result<Vec<Worklog>> {
        JiraClient::get_worklogs(self, key)
    }

    fn add_worklog(&mut self, key: &str, seconds: u64, comment: Option<String>) -> Result<Worklog> {
        JiraClient::add_worklog(self, key, seconds, comment)
    }

    fn add_comment(&mut self, key: &str, body: &str) -> Result<Comment> {
        JiraClient::add_comment(self, key, body)
    }

    fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        JiraClient::get_transitions(self, key)
    }

    fn transition_issue(&mut self, key: &str, transition_id: &str) -> Result<()> {
        JiraClient::transition_issue(self, key, transition_id)
    }

    fn create_issue(&mut self, issue: &NewIssue) -> Result<CreatedIssue> {
        JiraClient::create_issue(self, issue)
    }

    fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>> {
        JiraClient::get_remote_links(self, key)
    }

    fn create_remote_link(
        &mut self,
        key: &str,
        url: &str,
        title: &str,
    ) -> Result<CreatedRemoteLink> {
        JiraClient::create_remote_link(self, key, url, title)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });

    Err(JiraError::from_status(status.as_u16(), message).into())
}

/// First entry of `errorMessages`, else `message`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .get("errorMessages")
        .and_then(|m| m.get(0))
        .and_then(|m| m.as_str())
        .or_else(|| value.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
}
