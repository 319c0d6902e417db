//! `steward run` - govern one action, asking on this terminal when needed.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use steward_approval::{
    ActionGovernor, ActionPayload, Authorization, AuthorizedVia, ConfirmationGate,
    ConfirmationPrompt, ConfirmationPrompter, DenialReason, DomainAllowlist, classify,
};

use super::parse_payload;
use crate::config_bridge::Governance;
use crate::formatter::{OutputFormat, emit_json};
use crate::theme::Theme;

/// Exit status for an action that must not run.
const DENIED_EXIT: u8 = 2;

/// Asks for approval on stderr and reads the answer from stdin.
struct TerminalPrompter {
    gate: ConfirmationGate,
}

#[async_trait]
impl ConfirmationPrompter for TerminalPrompter {
    async fn present(&self, prompt: &ConfirmationPrompt) {
        let content = format!(
            "{}\n{}\n{}\n{}",
            Theme::kv("Action", &prompt.action),
            Theme::kv("Category", &prompt.category),
            Theme::kv("Details", &prompt.description),
            Theme::kv(
                "Expires",
                &format!("in {}s (no answer denies)", self.gate.timeout().as_secs())
            ),
        );
        eprintln!();
        eprintln!("{}", Theme::approval_box("Approval required", &content));
        eprint!("Approve? [y/N] ");
        let _ = io::stderr().flush();

        // Blocking read on a plain thread; the gate's timer settles the
        // request if nobody answers, and a late answer is ignored.
        let gate = self.gate.clone();
        let id = prompt.id.clone();
        std::thread::spawn(move || {
            let mut answer = String::new();
            let approved = match io::stdin().lock().read_line(&mut answer) {
                Ok(0) | Err(_) => false,
                Ok(_) => is_affirmative(&answer),
            };
            gate.resolve(&id, approved);
        });
    }
}

/// Only an explicit yes approves.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    action: &'a str,
    category: &'static str,
    allowed: bool,
    reason: &'static str,
}

impl<'a> RunReport<'a> {
    fn from_authorization(action: &'a str, authorization: &Authorization) -> Self {
        let reason = match authorization {
            Authorization::Allowed { via, .. } => match via {
                AuthorizedVia::Internal => "internal",
                AuthorizedVia::Policy => "policy",
                AuthorizedVia::Confirmed => "confirmed",
            },
            Authorization::Denied { reason, .. } => match reason {
                DenialReason::Policy => "policy",
                DenialReason::Rejected => "rejected",
            },
        };
        Self {
            action,
            category: authorization.category(),
            allowed: authorization.is_allowed(),
            reason,
        }
    }

    fn blocked_domain(action: &'a str) -> Self {
        Self {
            action,
            category: classify(action),
            allowed: false,
            reason: "domain",
        }
    }
}

/// Navigation target rejected by the allowlist, if any.
fn blocked_url<'p>(
    action: &str,
    payload: &'p ActionPayload,
    domains: &DomainAllowlist,
) -> Option<&'p str> {
    if action != "navigate" {
        return None;
    }
    let url = payload.get("url")?.as_str()?;
    (!domains.allows_url(url)).then_some(url)
}

/// Govern `action` and report whether it may run.
///
/// Returns exit status 2 when the action is denied.
pub(crate) async fn run_action(
    action: &str,
    payload: Option<&str>,
    governance: Governance,
    format: OutputFormat,
) -> Result<ExitCode> {
    let payload = parse_payload(payload)?;

    if let Some(url) = blocked_url(action, &payload, &governance.domains) {
        tracing::info!(url, "navigation outside allowlist");
        let report = RunReport::blocked_domain(action);
        match format {
            OutputFormat::Json => emit_json(&report)?,
            OutputFormat::Pretty => {
                println!("{}", Theme::error(&format!("{url} is not on the allowlist")));
            },
        }
        return Ok(ExitCode::from(DENIED_EXIT));
    }

    let gate = ConfirmationGate::with_timeout(governance.timeout);
    let prompter = Arc::new(TerminalPrompter { gate: gate.clone() });
    let governor = ActionGovernor::new(governance.policy, governance.confirm, gate, prompter);

    let authorization = governor.authorize(action, &payload).await;
    let report = RunReport::from_authorization(action, &authorization);

    match format {
        OutputFormat::Json => emit_json(&report)?,
        OutputFormat::Pretty if report.allowed => {
            println!("{}", Theme::success(&authorization.to_string()));
        },
        OutputFormat::Pretty => println!("{}", Theme::error(&authorization.to_string())),
    }

    Ok(if report.allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED_EXIT)
    })
}
