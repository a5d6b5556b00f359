use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jira_worklog::OutputFormat;
use jira_worklog::commands;
use jira_worklog::config;
use jira_worklog::jira;
use jira_worklog::worklog::WorkDuration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jwl")]
#[command(about = "Jira worklogs and issue context for your editor's coding assistant")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, format and validate work durations (1w = 5d, 1d = 8h)
    Duration(DurationArgs),

    /// Show the account the configured credentials belong to
    Whoami,

    /// Show issue details
    Show {
        #[arg(help = "Issue key (e.g. DEMO-1)")]
        key: String,
    },

    /// Add a comment to an issue
    Comment {
        #[arg(help = "Issue key")]
        key: String,
        #[arg(help = "Comment text")]
        body: String,
    },

    /// Move an issue to another status
    Status {
        #[arg(help = "Issue key")]
        key: String,
        #[arg(help = "Target status name, e.g. \"In Review\"")]
        status: String,
    },

    /// Create a subtask under an issue
    Subtask {
        #[arg(help = "Parent issue key")]
        parent: String,
        #[arg(help = "Subtask summary")]
        summary: String,
        #[arg(long, help = "Optional description")]
        description: Option<String>,
    },

    /// Link a GitHub pull request to an issue
    LinkPr {
        #[arg(help = "Issue key")]
        key: String,
        #[arg(help = "Pull request URL, e.g. https://github.com/owner/repo/pull/123")]
        url: String,
        #[arg(long, help = "Link title (defaults to \"PR #<n> - owner/repo\")")]
        title: Option<String>,
    },

    /// Log work on an issue
    LogWork {
        #[arg(help = "Issue key")]
        key: String,
        #[arg(help = "Time spent, e.g. \"2h 30m\" or \"1d\"")]
        time: WorkDuration,
        #[arg(long, help = "Optional comment")]
        comment: Option<String>,
        #[arg(long, help = "Preview without logging")]
        dry_run: bool,
    },

    /// Show worklogs of an issue
    Worklogs {
        #[arg(help = "Issue key")]
        key: String,
    },

    /// Write an issue context file for the coding assistant
    Context {
        #[arg(help = "Issue key")]
        key: String,
        #[arg(long, help = "Directory to write to (overrides context.file_location)")]
        output_dir: Option<std::path::PathBuf>,
    },

    /// Show configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct DurationArgs {
    #[command(subcommand)]
    action: DurationAction,
}

#[derive(Subcommand)]
enum DurationAction {
    /// Convert a duration string to seconds
    Parse {
        #[arg(help = "Duration, e.g. \"1d 4h 30m\"")]
        input: String,
    },
    /// Convert seconds to a duration string
    Format {
        #[arg(allow_negative_numbers = true, help = "Number of seconds")]
        seconds: i64,
    },
    /// Check a duration string and explain what is wrong with it
    Validate {
        #[arg(help = "Duration to check")]
        input: Option<String>,
    },
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let format = cli.format;

    // Duration tools need no configuration
    if let Commands::Duration(args) = &cli.command {
        return match &args.action {
            DurationAction::Parse { input } => commands::duration::parse(input, format),
            DurationAction::Format { seconds } => commands::duration::format(*seconds, format),
            DurationAction::Validate { input } => {
                commands::duration::validate(input.as_deref(), format)
            }
        };
    }

    let config = config::load().unwrap_or_else(|e| {
        warn!("no usable config ({:#}), using defaults", e);
        config::Config::default()
    });

    match &cli.command {
        Commands::Duration(_) => {}
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
        Commands::Whoami => {
            let tracker = jira::connect(&config)?;
            commands::issue::whoami(tracker.as_ref(), format)?;
        }
        Commands::Show { key } => {
            let tracker = jira::connect(&config)?;
            commands::issue::show(tracker.as_ref(), key, format)?;
        }
        Commands::Comment { key, body } => {
            let mut tracker = jira::connect(&config)?;
            commands::issue::comment(tracker.as_mut(), key, body, format)?;
        }
        Commands::Status { key, status } => {
            let mut tracker = jira::connect(&config)?;
            commands::issue::update_status(tracker.as_mut(), key, status, format)?;
        }
        Commands::Subtask {
            parent,
            summary,
            description,
        } => {
            let mut tracker = jira::connect(&config)?;
            commands::issue::create_subtask(
                tracker.as_mut(),
                parent,
                summary,
                description.clone(),
                format,
            )?;
        }
        Commands::LinkPr { key, url, title } => {
            let mut tracker = jira::connect(&config)?;
            commands::link::link_pr(tracker.as_mut(), key, url, title.as_deref(), format)?;
        }
        Commands::LogWork {
            key,
            time,
            comment,
            dry_run,
        } => {
            let mut tracker = jira::connect(&config)?;
            commands::worklog::log_work(
                tracker.as_mut(),
                key,
                *time,
                comment.clone(),
                *dry_run,
                format,
            )?;
        }
        Commands::Worklogs { key } => {
            let tracker = jira::connect(&config)?;
            commands::worklog::worklogs(tracker.as_ref(), key, format)?;
        }
        Commands::Context { key, output_dir } => {
            let tracker = jira::connect(&config)?;
            commands::context::export(
                tracker.as_ref(),
                key,
                config.context.file_location.as_ref(),
                output_dir.clone(),
                format,
            )?;
        }
    }

    Ok(())
}
