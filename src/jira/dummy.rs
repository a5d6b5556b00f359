//! In-memory tracker used when `use_dummy_data` is enabled.
//!
//! Every `DummyTracker` owns its own fixtures and id counters, so two
//! instances never see each other's writes and `reset` gives a clean slate.

use crate::error::JiraError;
use crate::jira::IssueTracker;
use crate::jira::models::{
    Comment, CommentPage, CreatedIssue, CreatedRemoteLink, Issue, IssueFields, KeyRef,
    NamedField, NewIssue, RemoteLink, RemoteLinkObject, TimeTracking, Transition, User, Worklog,
    jira_timestamp,
};
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;

pub const DUMMY_INSTANCE_URL: &str = "https://company.atlassian.net";

const FIRST_ISSUE_ID: u32 = 10000;
const FIRST_COMMENT_ID: u32 = 1000;
const FIRST_WORKLOG_ID: u32 = 1;
const FIRST_LINK_ID: u64 = 10000;

const TO_DO: &str = "To Do";
const IN_PROGRESS: &str = "In Progress";
const IN_REVIEW: &str = "In Review";
const DONE: &str = "Done";
const BLOCKED: &str = "Blocked";

/// Workflow: `(transition id, transition name, target status)` per current status.
fn workflow(status: &str) -> &'static [(&'static str, &'static str, &'static str)] {
    match status {
        TO_DO => &[("11", "Start Progress", IN_PROGRESS)],
        IN_PROGRESS => &[
            ("21", "Ready for Review", IN_REVIEW),
            ("22", "Block", BLOCKED),
            ("23", "Stop Progress", TO_DO),
        ],
        IN_REVIEW => &[
            ("31", "Done", DONE),
            ("32", "Back to In Progress", IN_PROGRESS),
        ],
        BLOCKED => &[("41", "Unblock", IN_PROGRESS)],
        DONE => &[("51", "Reopen", TO_DO)],
        _ => &[],
    }
}

#[derive(Debug, Clone)]
pub struct DummyTracker {
    issues: Vec<Issue>,
    worklogs: HashMap<String, Vec<Worklog>>,
    remote_links: HashMap<String, Vec<RemoteLink>>,
    next_issue_id: u32,
    next_comment_id: u32,
    next_worklog_id: u32,
    next_link_id: u64,
}

impl Default for DummyTracker {
    fn default() -> Self {
        Self::seeded()
    }
}

fn user(account_id: &str, name: &str, email: &str) -> User {
    User {
        account_id: Some(account_id.to_string()),
        display_name: name.to_string(),
        email_address: Some(email.to_string()),
    }
}

fn named(name: &str) -> Option<NamedField> {
    Some(NamedField {
        name: name.to_string(),
    })
}

pub fn dummy_users() -> Vec<User> {
    vec![
        user("user1", "John Doe", "john.doe@company.com"),
        user("user2", "Jane Smith", "jane.smith@company.com"),
        user("user3", "Bob Johnson", "bob.johnson@company.com"),
    ]
}

impl DummyTracker {
    /// Tracker with no issues and fresh counters.
    pub fn empty() -> Self {
        Self {
            issues: Vec::new(),
            worklogs: HashMap::new(),
            remote_links: HashMap::new(),
            next_issue_id: FIRST_ISSUE_ID,
            next_comment_id: FIRST_COMMENT_ID,
            next_worklog_id: FIRST_WORKLOG_ID,
            next_link_id: FIRST_LINK_ID,
        }
    }

    /// Tracker preloaded with a handful of demo issues.
    pub fn seeded() -> Self {
        let users = dummy_users();
        let mut tracker = Self::empty();

        let comment_id = tracker.next_comment_id;
        tracker.next_comment_id += 1;

        let login = tracker.insert_issue("DEMO", "Bug", "Login fails on Safari");
        login.fields.comment = Some(CommentPage {
            comments: vec![Comment {
                id: comment_id.to_string(),
                author: Some(users[1].clone()),
                body: "Reproduced on Safari 17.2.".to_string(),
                created: Some("2026-01-07T10:00:00.000+0000".to_string()),
            }],
            total: 1,
        });
        login.fields.description = Some(
            "<p>Users on Safari 17 are redirected back to the login page after \
             submitting valid credentials.</p>"
                .to_string(),
        );
        login.fields.status = named(IN_PROGRESS);
        login.fields.priority = named("High");
        login.fields.assignee = Some(users[0].clone());
        login.fields.reporter = Some(users[1].clone());
        login.fields.labels = vec!["frontend".to_string(), "auth".to_string()];
        login.fields.time_tracking = Some(TimeTracking {
            original_estimate_seconds: Some(28800),
            remaining_estimate_seconds: Some(19800),
            time_spent_seconds: Some(9000),
        });

        let dark_mode = tracker.insert_issue("DEMO", "Story", "Add dark mode to settings page");
        dark_mode.fields.priority = named("Medium");
        dark_mode.fields.reporter = Some(users[2].clone());
        dark_mode.fields.time_tracking = Some(TimeTracking {
            original_estimate_seconds: Some(144000),
            ..TimeTracking::default()
        });

        let cache = tracker.insert_issue("WEB", "Task", "Cache frequent database queries");
        cache.fields.description = Some(
            "Implemented Redis caching for frequently accessed database queries. \
             Reduced average response time by 60%."
                .to_string(),
        );
        cache.fields.status = named(DONE);
        cache.fields.priority = named("Low");
        cache.fields.assignee = Some(users[1].clone());

        let rate = tracker.insert_issue("API", "Bug", "Rate limiter rejects valid burst traffic");
        rate.fields.priority = named("Highest");
        rate.fields.assignee = Some(users[2].clone());

        tracker
    }

    /// Drop all writes and restore the seeded fixtures.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Add an issue with the next free key in `project_key`.
    pub fn insert_issue(
        &mut self,
        project_key: &str,
        issue_type: &str,
        summary: &str,
    ) -> &mut Issue {
        let number = self
            .issues
            .iter()
            .filter(|i| i.key.starts_with(&format!("{}-", project_key)))
            .count()
            + 1;

        let issue = Issue {
            id: self.next_issue_id.to_string(),
            key: format!("{}-{}", project_key, number),
            fields: IssueFields {
                summary: summary.to_string(),
                status: named(TO_DO),
                issue_type: named(issue_type),
                project: Some(KeyRef {
                    key: project_key.to_string(),
                }),
                created: Some(jira_timestamp(Utc::now())),
                comment: Some(CommentPage::default()),
                ..IssueFields::default()
            },
        };
        self.next_issue_id += 1;

        self.issues.push(issue);
        let last = self.issues.len() - 1;
        &mut self.issues[last]
    }

    fn find_issue_mut(&mut self, key: &str) -> Result<&mut Issue> {
        self.issues
            .iter_mut()
            .find(|i| i.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| not_found(key))
    }

    fn push_comment(&mut self, key: &str, body: &str, author: &User) -> Result<Comment> {
        let id = self.next_comment_id;
        let issue = self.find_issue_mut(key)?;

        let comment = Comment {
            id: id.to_string(),
            author: Some(author.clone()),
            body: body.to_string(),
            created: Some(jira_timestamp(Utc::now())),
        };

        let page = issue.fields.comment.get_or_insert_with(CommentPage::default);
        page.comments.push(comment.clone());
        page.total += 1;

        self.next_comment_id += 1;
        Ok(comment)
    }
}

fn not_found(key: &str) -> anyhow::Error {
    JiraError::NotFound(format!(
        "Issue does not exist or you do not have permission to see it: {}",
        key
    ))
    .into()
}

impl IssueTracker for DummyTracker {
    fn instance_url(&self) -> &str {
        DUMMY_INSTANCE_URL
    }

    fn current_user(&self) -> Result<User> {
        Ok(dummy_users()[0].clone())
    }

    fn get_issue(&self, key: &str) -> Result<Issue> {
        self.issues
            .iter()
            .find(|i| i.key.eq_ignore_ascii_case(key))
            .cloned()
            .ok_or_else(|| not_found(key))
    }

    fn get_worklogs(&self, key: &str) -> Result<Vec<Worklog>> {
        let issue = self.get_issue(key)?;
        Ok(self.worklogs.get(&issue.key).cloned().unwrap_or_default())
    }

    fn add_worklog(&mut self, key: &str, seconds: u64, comment: Option<String>) -> Result<Worklog> {
        if seconds == 0 {
            return Err(JiraError::Api {
                status: 400,
                message: "Worklog must be greater than 0".to_string(),
            }
            .into());
        }

        let id = self.next_worklog_id;
        let author = self.current_user()?;
        let issue = self.find_issue_mut(key)?;

        let spent = issue
            .fields
            .time_tracking
            .as_ref()
            .and_then(|t| t.time_spent_seconds)
            .unwrap_or(0)
            .checked_add(seconds)
            .ok_or_else(|| JiraError::Api {
                status: 400,
                message: format!("Worklog would overflow the time spent on {}", key),
            })?;

        let tracking = issue.fields.time_tracking.get_or_insert_with(TimeTracking::default);
        tracking.time_spent_seconds = Some(spent);
        if let Some(remaining) = tracking.remaining_estimate_seconds.as_mut() {
            *remaining = remaining.saturating_sub(seconds);
        }

        let worklog = Worklog {
            id: id.to_string(),
            issue_id: Some(issue.id.clone()),
            author: Some(author),
            comment,
            started: Some(jira_timestamp(Utc::now())),
            time_spent_seconds: seconds,
        };

        let issue_key = issue.key.clone();
        self.worklogs
            .entry(issue_key)
            .or_default()
            .push(worklog.clone());
        self.next_worklog_id += 1;

        Ok(worklog)
    }

    fn add_comment(&mut self, key: &str, body: &str) -> Result<Comment> {
        let author = self.current_user()?;
        self.push_comment(key, body, &author)
    }

    fn get_transitions(&self, key: &str) -> Result<Vec<Transition>> {
        let issue = self.get_issue(key)?;

        Ok(workflow(issue.status().unwrap_or(TO_DO))
            .iter()
            .map(|(id, name, to)| Transition {
                id: id.to_string(),
                name: name.to_string(),
                to: NamedField {
                    name: to.to_string(),
                },
            })
            .collect())
    }

    fn transition_issue(&mut self, key: &str, transition_id: &str) -> Result<()> {
        let issue = self.find_issue_mut(key)?;

        let target = workflow(issue.status().unwrap_or(TO_DO))
            .iter()
            .find(|(id, _, _)| *id == transition_id)
            .map(|(_, _, to)| *to)
            .ok_or_else(|| JiraError::Api {
                status: 400,
                message: format!("Transition id '{}' is not valid for {}", transition_id, key),
            })?;

        issue.fields.status = named(target);
        issue.fields.updated = Some(jira_timestamp(Utc::now()));
        Ok(())
    }

    fn create_issue(&mut self, new_issue: &NewIssue) -> Result<CreatedIssue> {
        let parent = match &new_issue.parent_key {
            Some(parent_key) => Some(self.get_issue(parent_key)?.key),
            None => None,
        };
        let author = self.current_user()?;

        let issue = self.insert_issue(
            &new_issue.project_key,
            &new_issue.issue_type,
            &new_issue.summary,
        );
        issue.fields.description = new_issue.description.clone();
        issue.fields.parent = parent.map(|key| KeyRef { key });
        issue.fields.assignee = Some(author.clone());
        issue.fields.reporter = Some(author);

        Ok(CreatedIssue {
            id: issue.id.clone(),
            key: issue.key.clone(),
            self_url: Some(format!("{}/rest/api/2/issue/{}", DUMMY_INSTANCE_URL, issue.id)),
        })
    }

    fn get_remote_links(&self, key: &str) -> Result<Vec<RemoteLink>> {
        let issue = self.get_issue(key)?;
        Ok(self.remote_links.get(&issue.key).cloned().unwrap_or_default())
    }

    fn create_remote_link(
        &mut self,
        key: &str,
        url: &str,
        title: &str,
    ) -> Result<CreatedRemoteLink> {
        let issue_key = self.get_issue(key)?.key;
        let id = self.next_link_id;

        self.remote_links
            .entry(issue_key.clone())
            .or_default()
            .push(RemoteLink {
                id: Some(id),
                object: Some(RemoteLinkObject {
                    url: url.to_string(),
                    title: title.to_string(),
                }),
            });
        self.next_link_id += 1;

        Ok(CreatedRemoteLink {
            id,
            self_url: Some(format!(
                "{}/rest/api/2/issue/{}/remotelink/{}",
                DUMMY_INSTANCE_URL, issue_key, id
            )),
        })
    }
}
