//! Action policy - admin-configured allow/deny rules per category.
//!
//! An [`ActionPolicy`] is loaded once at startup from a JSON file and is
//! read-only thereafter. [`decide`] combines it with the classifier and the
//! confirmation list into a single [`PolicyDecision`].
//!
//! # Decision Order
//!
//! First match wins:
//!
//! 1. Category is internal? -> `Allow`
//! 2. Category is in the confirmation list? -> `Confirm`
//! 3. No policy configured? -> `Allow`
//! 4. Category in the policy's `allow` list? -> `Allow`
//! 5. Category in the policy's `deny` list? -> `Deny`
//! 6. Otherwise -> the policy's `default`
//!
//! The confirmation list outranks the allow list: a category an operator
//! marked as needing confirmation cannot be waved through by policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::action::{INTERNAL_CATEGORY, classify};
use crate::error::{ApprovalError, ApprovalResult};

/// Maximum accepted policy file size (1 MB).
const MAX_POLICY_FILE_SIZE: u64 = 1_048_576;

/// Label used in errors for policies parsed from memory.
const INLINE_SOURCE: &str = "<inline>";

/// The fallback verdict of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyDefault {
    /// Unlisted categories run unattended.
    Allow,
    /// Unlisted categories are blocked.
    Deny,
}

impl From<PolicyDefault> for PolicyDecision {
    fn from(default: PolicyDefault) -> Self {
        match default {
            PolicyDefault::Allow => Self::Allow,
            PolicyDefault::Deny => Self::Deny,
        }
    }
}

/// The verdict for a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyDecision {
    /// Proceed without asking.
    Allow,
    /// Block the action.
    Deny,
    /// Pause until a human approves.
    Confirm,
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
            Self::Confirm => write!(f, "confirm"),
        }
    }
}

/// Category-level allow/deny rules.
///
/// # Example
///
/// ```
/// use steward_approval::{ActionPolicy, PolicyDecision, PolicyDefault};
///
/// let policy = ActionPolicy::from_json(r#"{"default": "allow", "deny": ["eval"]}"#).unwrap();
/// assert_eq!(policy.default, PolicyDefault::Allow);
/// assert_eq!(policy.decide_category("eval"), PolicyDecision::Deny);
/// assert_eq!(policy.decide_category("click"), PolicyDecision::Allow);
///
/// assert!(ActionPolicy::from_json(r#"{"default": "maybe"}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPolicy {
    /// Verdict for categories in neither list.
    pub default: PolicyDefault,
    /// Categories that always run (checked before `deny`).
    pub allow: Vec<String>,
    /// Categories that are always blocked.
    pub deny: Vec<String>,
}

/// Wire shape of a policy file, before the `default` invariant is checked.
#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    allow: Option<Vec<String>>,
    #[serde(default)]
    deny: Option<Vec<String>>,
}

impl TryFrom<RawPolicy> for ActionPolicy {
    type Error = ApprovalError;

    fn try_from(raw: RawPolicy) -> ApprovalResult<Self> {
        let default = match raw.default.as_ref().and_then(Value::as_str) {
            Some("allow") => PolicyDefault::Allow,
            Some("deny") => PolicyDefault::Deny,
            _ => {
                return Err(ApprovalError::InvalidPolicyDefault {
                    found: raw
                        .default
                        .map_or_else(|| "nothing".to_owned(), |v| v.to_string()),
                });
            },
        };

        Ok(Self {
            default,
            allow: raw.allow.unwrap_or_default(),
            deny: raw.deny.unwrap_or_default(),
        })
    }
}

impl ActionPolicy {
    /// A policy with the given default and empty lists.
    #[must_use]
    pub fn new(default: PolicyDefault) -> Self {
        Self {
            default,
            allow: Vec::new(),
            deny: Vec::new(),
        }
    }

    /// Add a category to the allow list.
    #[must_use]
    pub fn with_allow(mut self, category: impl Into<String>) -> Self {
        self.allow.push(category.into());
        self
    }

    /// Add a category to the deny list.
    #[must_use]
    pub fn with_deny(mut self, category: impl Into<String>) -> Self {
        self.deny.push(category.into());
        self
    }

    /// Parse a policy from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::PolicyParse`] for malformed JSON and
    /// [`ApprovalError::InvalidPolicyDefault`] when `default` is not exactly
    /// `"allow"` or `"deny"`. Absent `allow`/`deny` lists are treated as empty.
    pub fn from_json(json: &str) -> ApprovalResult<Self> {
        Self::parse(json, INLINE_SOURCE)
    }

    /// Load a policy from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, exceeds 1 MB, is not
    /// valid JSON, or carries an invalid `default`.
    pub fn load(path: &Path) -> ApprovalResult<Self> {
        let read_error = |e| ApprovalError::PolicyRead {
            path: path.display().to_string(),
            source: e,
        };

        let size = std::fs::metadata(path).map_err(read_error)?.len();
        if size > MAX_POLICY_FILE_SIZE {
            return Err(ApprovalError::PolicyTooLarge {
                path: path.display().to_string(),
                size,
                limit: MAX_POLICY_FILE_SIZE,
            });
        }

        let content = std::fs::read_to_string(path).map_err(read_error)?;

        let policy = Self::parse(&content, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            default = ?policy.default,
            allow = policy.allow.len(),
            deny = policy.deny.len(),
            "loaded action policy"
        );
        Ok(policy)
    }

    fn parse(json: &str, source: &str) -> ApprovalResult<Self> {
        let raw: RawPolicy =
            serde_json::from_str(json).map_err(|e| ApprovalError::PolicyParse {
                path: source.to_owned(),
                source: e,
            })?;
        Self::try_from(raw)
    }

    /// Apply steps 4–6 of the decision order to an already-classified category.
    #[must_use]
    pub fn decide_category(&self, category: &str) -> PolicyDecision {
        if self.allow.iter().any(|c| c == category) {
            return PolicyDecision::Allow;
        }
        if self.deny.iter().any(|c| c == category) {
            return PolicyDecision::Deny;
        }
        self.default.into()
    }

    /// Decide an action under this policy.
    #[must_use]
    pub fn check(&self, action: &str, confirm: &ConfirmCategories) -> PolicyDecision {
        decide(action, Some(self), confirm)
    }
}

/// Categories that always require human confirmation, regardless of policy.
///
/// Entries are trimmed and lower-cased; blanks are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmCategories(HashSet<String>);

impl ConfirmCategories {
    /// An empty set (nothing needs confirmation).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"eval, download"`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    /// Whether a category requires confirmation.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    /// Number of categories in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the categories in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ConfirmCategories {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

/// Decide whether an action may proceed.
///
/// Pure: the same inputs always produce the same decision.
#[must_use]
pub fn decide(
    action: &str,
    policy: Option<&ActionPolicy>,
    confirm: &ConfirmCategories,
) -> PolicyDecision {
    let category = classify(action);

    if category == INTERNAL_CATEGORY {
        return PolicyDecision::Allow;
    }

    if confirm.contains(category) {
        return PolicyDecision::Confirm;
    }

    match policy {
        Some(policy) => policy.decide_category(category),
        None => PolicyDecision::Allow,
    }
}
