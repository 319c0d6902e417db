//! `steward classify` and `steward describe`.

use anyhow::Result;
use serde::Serialize;
use steward_approval::{classify, describe, is_internal};

use super::parse_payload;
use crate::formatter::{OutputFormat, emit_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct Classification<'a> {
    action: &'a str,
    category: &'static str,
    internal: bool,
}

/// Print the category an action belongs to.
pub(crate) fn run_classify(action: &str, format: OutputFormat) -> Result<()> {
    let report = Classification {
        action,
        category: classify(action),
        internal: is_internal(action),
    };

    match format {
        OutputFormat::Json => emit_json(&report)?,
        OutputFormat::Pretty => {
            println!("{}", Theme::kv("Category", report.category));
            if report.internal {
                println!("{}", Theme::dimmed("Session operation; never governed"));
            }
        },
    }
    Ok(())
}

#[derive(Serialize)]
struct Description<'a> {
    action: &'a str,
    description: String,
}

/// Print the text an approver would see for an action.
pub(crate) fn run_describe(action: &str, payload: Option<&str>, format: OutputFormat) -> Result<()> {
    let payload = parse_payload(payload)?;
    let report = Description {
        action,
        description: describe(action, &payload),
    };

    match format {
        OutputFormat::Json => emit_json(&report)?,
        OutputFormat::Pretty => println!("{}", report.description),
    }
    Ok(())
}
