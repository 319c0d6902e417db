//! `steward domain` - test a URL against the navigation allowlist.

use anyhow::Result;
use serde::Serialize;
use steward_approval::DomainAllowlist;

use crate::formatter::{OutputFormat, emit_json};
use crate::theme::Theme;

#[derive(Serialize)]
struct DomainCheck<'a> {
    url: &'a str,
    allowed: bool,
    patterns: &'a [String],
}

/// Report whether navigating to `url` is permitted.
pub(crate) fn run_domain(url: &str, allowlist: &DomainAllowlist, format: OutputFormat) -> Result<()> {
    let report = DomainCheck {
        url,
        allowed: allowlist.allows_url(url),
        patterns: allowlist.patterns(),
    };

    match format {
        OutputFormat::Json => emit_json(&report)?,
        OutputFormat::Pretty => {
            if allowlist.is_empty() {
                println!("{}", Theme::info("No allowlist configured; all domains allowed"));
            } else if report.allowed {
                println!("{}", Theme::success(&format!("{url} is allowed")));
            } else {
                println!("{}", Theme::error(&format!("{url} is not on the allowlist")));
                println!("{}", Theme::dimmed(&report.patterns.join(", ")));
            }
        },
    }
    Ok(())
}
