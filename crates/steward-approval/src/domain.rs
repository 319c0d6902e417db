//! Navigation domain allowlist.
//!
//! Patterns are either exact hostnames (`example.com`) or wildcard suffixes
//! (`*.example.com`). A wildcard also matches its bare apex, so
//! `*.example.com` admits both `example.com` and `api.example.com`.
//!
//! The browser driver applies [`DomainAllowlist::allows_url`] to document
//! navigations only; sub-resource loads of an already-admitted page are not
//! filtered.

use url::Url;

/// Whether a hostname matches any allowlist pattern.
///
/// Matching is exact; callers lower-case hostnames first
/// ([`parse_domain_list`] lower-cases the patterns).
#[must_use]
pub fn is_domain_allowed(hostname: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| match pattern.strip_prefix("*.") {
        Some(apex) => {
            hostname == apex
                || hostname
                    .strip_suffix(apex)
                    .is_some_and(|sub| sub.ends_with('.'))
        },
        None => hostname == pattern,
    })
}

/// Parse a comma-separated pattern list, trimming and lower-casing entries.
#[must_use]
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

/// A set of permitted navigation domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainAllowlist {
    patterns: Vec<String>,
}

impl DomainAllowlist {
    /// Build an allowlist from patterns.
    #[must_use]
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Build an allowlist from a comma-separated list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            patterns: parse_domain_list(raw),
        }
    }

    /// Whether filtering is disabled (no patterns configured).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The normalized patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether a bare hostname is permitted.
    #[must_use]
    pub fn allows_host(&self, hostname: &str) -> bool {
        self.is_empty() || is_domain_allowed(&hostname.to_lowercase(), &self.patterns)
    }

    /// Whether a navigation to `url` is permitted.
    ///
    /// Only `http`/`https` URLs with a host are filtered. Unparseable URLs,
    /// `about:`/`data:`/`file:` schemes, and an empty allowlist all pass;
    /// the driver decides what to do with those.
    #[must_use]
    pub fn allows_url(&self, url: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return true;
        }

        match parsed.host_str() {
            Some(host) => {
                let allowed = self.allows_host(host);
                if !allowed {
                    tracing::debug!(host, "navigation blocked by domain allowlist");
                }
                allowed
            },
            None => true,
        }
    }
}
