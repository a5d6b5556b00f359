use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout the tracker expects for `started` (`+0000`, not `+00:00`).
pub const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

pub fn jira_timestamp(at: DateTime<Utc>) -> String {
    at.format(JIRA_TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "emailAddress", default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NamedField {
    pub name: String,
}

/// Reference to another issue or a project by key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyRef {
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeTracking {
    #[serde(default)]
    pub original_estimate_seconds: Option<u64>,
    #[serde(default)]
    pub remaining_estimate_seconds: Option<u64>,
    #[serde(default)]
    pub time_spent_seconds: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub author: Option<User>,
    pub body: String,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<NamedField>,
    #[serde(rename = "issuetype", default)]
    pub issue_type: Option<NamedField>,
    #[serde(default)]
    pub priority: Option<NamedField>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub reporter: Option<User>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub project: Option<KeyRef>,
    #[serde(default)]
    pub parent: Option<KeyRef>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(rename = "timetracking", default)]
    pub time_tracking: Option<TimeTracking>,
    #[serde(default)]
    pub comment: Option<CommentPage>,
}

/// Issue as returned by `GET /issue/{key}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    pub fn status(&self) -> Option<&str> {
        self.fields.status.as_ref().map(|s| s.name.as_str())
    }

    pub fn issue_type(&self) -> Option<&str> {
        self.fields.issue_type.as_ref().map(|t| t.name.as_str())
    }

    pub fn priority(&self) -> Option<&str> {
        self.fields.priority.as_ref().map(|p| p.name.as_str())
    }

    pub fn assignee(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .map(|u| u.display_name.as_str())
    }

    pub fn reporter(&self) -> Option<&str> {
        self.fields
            .reporter
            .as_ref()
            .map(|u| u.display_name.as_str())
    }

    /// Project key from `fields.project`, else the part of the key before `-`.
    pub fn project_key(&self) -> &str {
        match &self.fields.project {
            Some(project) => project.key.as_str(),
            None => self.key.split('-').next().unwrap_or(&self.key),
        }
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.fields.parent.as_ref().map(|p| p.key.as_str())
    }

    pub fn comments(&self) -> &[Comment] {
        self.fields
            .comment
            .as_ref()
            .map(|c| c.comments.as_slice())
            .unwrap_or(&[])
    }
}

/// Worklog entry on an issue
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Worklog {
    pub id: String,
    #[serde(rename = "issueId", default)]
    pub issue_id: Option<String>,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: u64,
}

/// Sum of `timeSpentSeconds`, or `None` when it does not fit in a `u64`.
pub fn total_time_spent(worklogs: &[Worklog]) -> Option<u64> {
    worklogs
        .iter()
        .try_fold(0u64, |acc, log| acc.checked_add(log.time_spent_seconds))
}

/// Response of `GET /issue/{key}/worklog`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPage {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

/// Request body for adding a worklog
#[derive(Debug, Serialize)]
pub struct AddWorklogRequest {
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: u64,
    pub started: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Request body for adding a comment
#[derive(Debug, Serialize)]
pub struct AddCommentRequest {
    pub body: String,
}

/// Workflow transition available from an issue's current status
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub to: NamedField,
}

/// Response of `GET /issue/{key}/transitions`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransitionPage {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// Request body for `POST /issue/{key}/transitions`
#[derive(Debug, Serialize)]
pub struct TransitionRequest {
    pub transition: TransitionId,
}

#[derive(Debug, Serialize)]
pub struct TransitionId {
    pub id: String,
}

/// Issue to create. `parent_key` makes it a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub parent_key: Option<String>,
}

/// Request body for `POST /issue`
#[derive(Debug, Serialize)]
pub struct CreateIssueRequest {
    pub fields: CreateIssueFields,
}

#[derive(Debug, Serialize)]
pub struct CreateIssueFields {
    pub project: KeyRef,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "issuetype")]
    pub issue_type: NamedField,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<KeyRef>,
}

impl From<&NewIssue> for CreateIssueRequest {
    fn from(issue: &NewIssue) -> Self {
        Self {
            fields: CreateIssueFields {
                project: KeyRef {
                    key: issue.project_key.clone(),
                },
                summary: issue.summary.clone(),
                description: issue.description.clone(),
                issue_type: NamedField {
                    name: issue.issue_type.clone(),
                },
                parent: issue.parent_key.clone().map(|key| KeyRef { key }),
            },
        }
    }
}

/// Response of `POST /issue`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}

/// Link from an issue to an outside resource, such as a pull request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteLink {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub object: Option<RemoteLinkObject>,
}

impl RemoteLink {
    pub fn url(&self) -> Option<&str> {
        self.object.as_ref().map(|o| o.url.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteLinkObject {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Request body for `POST /issue/{key}/remotelink`
#[derive(Debug, Serialize)]
pub struct CreateRemoteLinkRequest {
    pub object: RemoteLinkObject,
}

/// Response of `POST /issue/{key}/remotelink`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreatedRemoteLink {
    pub id: u64,
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,
}
