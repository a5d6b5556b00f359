//! Error types shared across the crate.
//!
//! `DurationError` is what users see when a typed work duration is rejected.
//! `JiraError` classifies failures coming back from the issue tracker API.

use thiserror::Error;

/// Reasons a work-duration string is rejected.
///
/// The `Display` text of each variant is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// No input was supplied at all.
    #[error("Time string is required")]
    Missing,

    /// Input was supplied but is blank after trimming.
    #[error("Time string cannot be empty")]
    EmptyInput,

    /// Input contains no `<number><unit>` token.
    #[error(r#"Invalid time format. Use formats like: "2h", "30m", "2h 30m", "1d 4h""#)]
    NoRecognizedUnits,

    /// Input parsed, but to zero seconds.
    #[error("Time must be greater than 0")]
    ZeroDuration,
}

/// Errors returned by the issue tracker REST API.
#[derive(Error, Debug)]
pub enum JiraError {
    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RateLimited(String),

    /// Any other non-success status.
    #[error("Jira API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never got a response.
    #[error("No response received from Jira. Please check your network connection.")]
    Network(#[source] reqwest::Error),
}

impl JiraError {
    /// Classify a non-success response by status code.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => JiraError::Authentication(message),
            403 => JiraError::Permission(message),
            404 => JiraError::NotFound(message),
            429 => JiraError::RateLimited(message),
            _ => JiraError::Api { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            JiraError::Authentication(_) => Some(401),
            JiraError::Permission(_) => Some(403),
            JiraError::NotFound(_) => Some(404),
            JiraError::RateLimited(_) => Some(429),
            JiraError::Api { status, .. } => Some(*status),
            JiraError::Network(_) => None,
        }
    }
}
