pub mod commands;
pub mod config;
pub mod error;
pub mod jira;
pub mod keyring;
pub mod platform;
pub mod utils;
pub mod worklog;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
