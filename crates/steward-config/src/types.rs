//! Configuration types.
//!
//! Every struct implements [`Default`] with the same values as the embedded
//! `defaults.toml`, so a bare `[section]` header produces a working
//! configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Action policy, confirmation, and navigation settings.
    pub governance: GovernanceSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

/// Governance settings for browser actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceSection {
    /// Path to the JSON action policy. `None` leaves actions ungoverned
    /// apart from `confirm_actions`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_file: Option<PathBuf>,
    /// Categories that always require human confirmation.
    pub confirm_actions: Vec<String>,
    /// Seconds to wait for an approver before auto-denying.
    pub confirm_timeout_secs: u64,
    /// Navigation allowlist patterns (`example.com`, `*.example.com`).
    /// Empty disables filtering.
    pub allowed_domains: Vec<String>,
}

impl Default for GovernanceSection {
    fn default() -> Self {
        Self {
            policy_file: None,
            confirm_actions: Vec::new(),
            confirm_timeout_secs: 60,
            allowed_domains: Vec::new(),
        }
    }
}

impl GovernanceSection {
    /// The categories that always need confirmation: trimmed, lower-cased,
    /// blanks dropped.
    #[must_use]
    pub fn confirm_categories(&self) -> BTreeSet<String> {
        self.confirm_actions
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect()
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["steward_approval=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
