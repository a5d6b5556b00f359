use crate::OutputFormat;
use crate::commands::print_json;
use crate::worklog::duration::{
    format_duration, format_seconds, parse_duration, validate_duration,
};
use anyhow::Result;
use serde_json::json;

pub fn parse(input: &str, format: OutputFormat) -> Result<()> {
    let Some(secs) = parse_duration(input) else {
        if format == OutputFormat::Json {
            print_json(&json!({ "input": input, "seconds": null }))?;
        }
        anyhow::bail!("Could not parse {:?} as a work duration", input);
    };

    match format {
        OutputFormat::Text => println!("{}", secs),
        OutputFormat::Json => print_json(&json!({
            "input": input,
            "seconds": secs,
            "formatted": format_seconds(secs),
        }))?,
    }

    Ok(())
}

pub fn format(secs: i64, format: OutputFormat) -> Result<()> {
    let formatted = format_duration(secs);

    match format {
        OutputFormat::Text => println!("{}", formatted),
        OutputFormat::Json => print_json(&json!({
            "seconds": secs,
            "formatted": formatted,
        }))?,
    }

    Ok(())
}

/// Exits non-zero with the user-facing message when the input is rejected.
pub fn validate(input: Option<&str>, format: OutputFormat) -> Result<()> {
    match validate_duration(input) {
        Ok(secs) => {
            let formatted = format_seconds(secs);
            match format {
                OutputFormat::Text => println!("✓ Valid: {} ({} seconds)", formatted, secs),
                OutputFormat::Json => print_json(&json!({
                    "valid": true,
                    "seconds": secs,
                    "formatted": formatted,
                    "error": null,
                }))?,
            }
            Ok(())
        }
        Err(e) => {
            if format == OutputFormat::Json {
                print_json(&json!({
                    "valid": false,
                    "seconds": null,
                    "error": e.to_string(),
                }))?;
            }
            Err(e.into())
        }
    }
}
