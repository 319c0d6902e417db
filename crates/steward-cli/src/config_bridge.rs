//! Bridge from `steward_config::Config` to the types the commands run on.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use steward_approval::{
    ActionPolicy, ConfirmCategories, DomainAllowlist, UNKNOWN_CATEGORY, categories,
};
use steward_config::Config;
use steward_telemetry::{LogConfig, LogFormat};

/// Convert config to [`LogConfig`].
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    let format = cfg.logging.format.parse().unwrap_or(LogFormat::Compact);

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    log_config
}

/// Command-line values that take precedence over the `[governance]` section.
#[derive(Debug, Default)]
pub(crate) struct GovernanceOverrides {
    /// Action policy file.
    pub(crate) policy: Option<PathBuf>,
    /// Comma-separated confirmation categories.
    pub(crate) confirm: Option<String>,
    /// Confirmation wait window in seconds.
    pub(crate) timeout_secs: Option<u64>,
    /// Comma-separated navigation allowlist.
    pub(crate) allow: Option<String>,
}

/// Everything the governor needs, resolved from config and flags.
#[derive(Debug)]
pub(crate) struct Governance {
    /// Loaded action policy; `None` means ungoverned.
    pub(crate) policy: Option<ActionPolicy>,
    /// Categories that always need a human.
    pub(crate) confirm: ConfirmCategories,
    /// How long to wait for an answer.
    pub(crate) timeout: Duration,
    /// Navigation allowlist.
    pub(crate) domains: DomainAllowlist,
}

/// Resolve governance settings, loading the policy file if one is named.
pub(crate) fn governance(cfg: &Config, overrides: &GovernanceOverrides) -> Result<Governance> {
    let section = &cfg.governance;

    let policy_path = overrides
        .policy
        .as_ref()
        .or(section.policy_file.as_ref());
    let policy = match policy_path {
        Some(path) => Some(
            ActionPolicy::load(path)
                .with_context(|| format!("failed to load action policy {}", path.display()))?,
        ),
        None => None,
    };

    let confirm = match &overrides.confirm {
        Some(raw) => ConfirmCategories::parse(raw),
        None => section.confirm_categories().iter().collect(),
    };

    for (source, category) in unrecognized_categories(&confirm, policy.as_ref()) {
        tracing::warn!(source, category, "category matches no action, entry has no effect");
    }

    let timeout =
        Duration::from_secs(overrides.timeout_secs.unwrap_or(section.confirm_timeout_secs));

    let domains = match &overrides.allow {
        Some(raw) => DomainAllowlist::parse(raw),
        None => DomainAllowlist::new(&section.allowed_domains),
    };

    tracing::debug!(
        governed = policy.is_some(),
        confirm = confirm.len(),
        timeout_secs = timeout.as_secs(),
        domains = domains.patterns().len(),
        "governance resolved"
    );

    Ok(Governance {
        policy,
        confirm,
        timeout,
        domains,
    })
}

/// Configured category names that no action classifies into, with the list
/// each came from.
fn unrecognized_categories<'a>(
    confirm: &'a ConfirmCategories,
    policy: Option<&'a ActionPolicy>,
) -> Vec<(&'static str, &'a str)> {
    let known = categories();
    let is_known = |name: &str| name == UNKNOWN_CATEGORY || known.iter().any(|k| *k == name);

    let mut confirm: Vec<&str> = confirm.iter().filter(|c| !is_known(*c)).collect();
    confirm.sort_unstable();

    let mut found: Vec<(&'static str, &'a str)> =
        confirm.into_iter().map(|c| ("confirm", c)).collect();
    if let Some(policy) = policy {
        let lists = [("policy.allow", &policy.allow), ("policy.deny", &policy.deny)];
        for (source, list) in lists {
            found.extend(
                list.iter()
                    .map(String::as_str)
                    .filter(|c| !is_known(*c))
                    .map(|c| (source, c)),
            );
        }
    }
    found
}
