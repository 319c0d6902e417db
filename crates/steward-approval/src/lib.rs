//! Steward Approval - Governance for autonomous browser actions.
//!
//! This crate decides whether an action an agent wants to perform against a
//! browser session may run unattended, must be blocked, or must wait for a
//! human to approve it.
//!
//! # Components
//!
//! - **Classifier** ([`action`]): maps an action name to a category.
//! - **Policy Engine** ([`policy`]): turns a category into a [`PolicyDecision`].
//! - **Confirmation Gate** ([`gate`]): parks `confirm` decisions until an
//!   approver answers or the wait window elapses (auto-deny).
//! - **Governor** ([`governor`]): runs the three in order for one action.
//! - **Domain allowlist** ([`domain`]): hostname predicate for navigation filtering.
//!
//! # Example
//!
//! ```
//! use steward_approval::{ActionPolicy, ConfirmCategories, PolicyDecision, decide};
//!
//! let policy = ActionPolicy::from_json(r#"{"default": "deny", "allow": ["click"]}"#).unwrap();
//! let confirm = ConfirmCategories::parse("eval");
//!
//! assert_eq!(decide("click", Some(&policy), &confirm), PolicyDecision::Allow);
//! assert_eq!(decide("evaluate", Some(&policy), &confirm), PolicyDecision::Confirm);
//! assert_eq!(decide("upload", Some(&policy), &confirm), PolicyDecision::Deny);
//! // Session meta-operations are never governed.
//! assert_eq!(decide("launch", Some(&policy), &confirm), PolicyDecision::Allow);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod action;
pub mod domain;
/// Error types and results for the approval module.
pub mod error;
pub mod gate;
pub mod governor;
pub mod policy;
pub mod request;

pub use action::{INTERNAL_CATEGORY, UNKNOWN_CATEGORY, categories, classify, describe, is_internal};
pub use domain::{DomainAllowlist, is_domain_allowed, parse_domain_list};
pub use error::{ApprovalError, ApprovalResult};
pub use gate::{ConfirmationGate, ConfirmationOutcome, DEFAULT_CONFIRM_TIMEOUT};
pub use governor::{
    ActionGovernor, Authorization, AuthorizedVia, ConfirmationPrompter, DenialReason,
};
pub use policy::{ActionPolicy, ConfirmCategories, PolicyDecision, PolicyDefault, decide};
pub use request::{ConfirmationId, ConfirmationPrompt};

/// The original action payload: an opaque field → value mapping.
pub type ActionPayload = serde_json::Map<String, serde_json::Value>;
