//! `steward check` - the policy decision, without prompting anyone.

use anyhow::Result;
use serde::Serialize;
use steward_approval::{PolicyDecision, classify, decide};

use crate::config_bridge::Governance;
use crate::formatter::{OutputFormat, emit_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct Check<'a> {
    action: &'a str,
    category: &'static str,
    decision: PolicyDecision,
    governed: bool,
}

fn check<'a>(action: &'a str, governance: &Governance) -> Check<'a> {
    Check {
        action,
        category: classify(action),
        decision: decide(action, governance.policy.as_ref(), &governance.confirm),
        governed: governance.policy.is_some(),
    }
}

/// Print what the policy engine would do with an action.
pub(crate) fn run_check(action: &str, governance: &Governance, format: OutputFormat) -> Result<()> {
    let report = check(action, governance);

    match format {
        OutputFormat::Json => emit_json(&report)?,
        OutputFormat::Pretty => {
            println!("{}", Theme::kv("Action", report.action));
            println!("{}", Theme::kv("Category", report.category));
            println!("{}", Theme::kv("Decision", &Theme::decision(report.decision)));
            if !report.governed {
                println!("{}", Theme::dimmed("No action policy loaded"));
            }
        },
    }
    Ok(())
}
