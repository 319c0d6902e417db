//! Action governor - runs the governance steps for one action.
//!
//! The [`ActionGovernor`] is the single entry point the execution pipeline
//! calls before running a browser action.
//!
//! # Flow
//!
//! 1. **Classify** the action name into a category
//! 2. **Decide** against the policy and confirmation list
//! 3. On `confirm`, **park** the action in the [`ConfirmationGate`] and hand
//!    the prompt to the [`ConfirmationPrompter`]
//! 4. **Wait** for the approver or the timeout
//!
//! Denial by a human and denial by timeout produce the same
//! [`Authorization`]; downstream code cannot and should not tell them apart.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use crate::ActionPayload;
use crate::action::{INTERNAL_CATEGORY, classify, describe};
use crate::gate::ConfirmationGate;
use crate::policy::{ActionPolicy, ConfirmCategories, PolicyDecision, decide};
use crate::request::ConfirmationPrompt;

/// Delivers confirmation prompts to whatever approval channel exists.
///
/// Implementations surface the prompt (terminal, chat message, RPC
/// notification) and later answer through
/// [`ConfirmationGate::resolve`] using the prompt's id. `present` should
/// return once the prompt is delivered, not once it is answered.
#[async_trait]
pub trait ConfirmationPrompter: Send + Sync {
    /// Surface a pending confirmation to the approver.
    async fn present(&self, prompt: &ConfirmationPrompt);
}

/// Why an action was allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizedVia {
    /// Session meta-operation; never governed.
    Internal,
    /// Allowed by policy (or no policy configured).
    Policy,
    /// A human approved it.
    Confirmed,
}

/// Why an action was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Blocked by the action policy.
    Policy,
    /// Confirmation was refused or not given in time.
    Rejected,
}

/// The governor's verdict for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Run the action.
    Allowed {
        /// Category the action was classified into.
        category: &'static str,
        /// How it was authorized.
        via: AuthorizedVia,
    },
    /// Do not run the action.
    Denied {
        /// Category the action was classified into.
        category: &'static str,
        /// Why it was blocked.
        reason: DenialReason,
    },
}

impl Authorization {
    /// Whether the action may run.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// The category of the governed action.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Allowed { category, .. } | Self::Denied { category, .. } => category,
        }
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed { category, .. } => write!(f, "allowed ({category})"),
            Self::Denied {
                category,
                reason: DenialReason::Policy,
            } => write!(f, "denied by policy ({category})"),
            Self::Denied {
                category,
                reason: DenialReason::Rejected,
            } => write!(f, "denied by user ({category})"),
        }
    }
}

/// Combines classification, policy, and confirmation gating.
pub struct ActionGovernor {
    policy: Option<ActionPolicy>,
    confirm: ConfirmCategories,
    gate: ConfirmationGate,
    prompter: Arc<dyn ConfirmationPrompter>,
}

impl ActionGovernor {
    /// Create a governor.
    ///
    /// `policy: None` means ungoverned: everything not in `confirm` runs.
    #[must_use]
    pub fn new(
        policy: Option<ActionPolicy>,
        confirm: ConfirmCategories,
        gate: ConfirmationGate,
        prompter: Arc<dyn ConfirmationPrompter>,
    ) -> Self {
        Self {
            policy,
            confirm,
            gate,
            prompter,
        }
    }

    /// The gate holding this governor's pending confirmations.
    #[must_use]
    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// The policy decision for an action, without waiting on anyone.
    #[must_use]
    pub fn decide(&self, action: &str) -> PolicyDecision {
        decide(action, self.policy.as_ref(), &self.confirm)
    }

    /// Decide an action, waiting for human confirmation when required.
    pub async fn authorize(&self, action: &str, payload: &ActionPayload) -> Authorization {
        let category = classify(action);
        let span = tracing::info_span!("authorize", action, category);
        self.authorize_classified(action, category, payload)
            .instrument(span)
            .await
    }

    async fn authorize_classified(
        &self,
        action: &str,
        category: &'static str,
        payload: &ActionPayload,
    ) -> Authorization {
        let decision = self.decide(action);
        tracing::debug!(%decision, "policy decision");

        match decision {
            PolicyDecision::Allow => Authorization::Allowed {
                category,
                via: if category == INTERNAL_CATEGORY {
                    AuthorizedVia::Internal
                } else {
                    AuthorizedVia::Policy
                },
            },
            PolicyDecision::Deny => {
                tracing::info!("action denied by policy");
                Authorization::Denied {
                    category,
                    reason: DenialReason::Policy,
                }
            },
            PolicyDecision::Confirm => self.await_confirmation(action, category, payload).await,
        }
    }

    async fn await_confirmation(
        &self,
        action: &str,
        category: &'static str,
        payload: &ActionPayload,
    ) -> Authorization {
        let description = describe(action, payload);
        let (id, outcome) = self
            .gate
            .request(action, category, description, payload.clone());

        // Present the stored prompt so the approver and `pending()` agree.
        // It is only missing if the request already settled.
        if let Some(prompt) = self.gate.prompt(&id) {
            self.prompter.present(&prompt).await;
        }

        if outcome.await {
            Authorization::Allowed {
                category,
                via: AuthorizedVia::Confirmed,
            }
        } else {
            Authorization::Denied {
                category,
                reason: DenialReason::Rejected,
            }
        }
    }
}

impl fmt::Debug for ActionGovernor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGovernor")
            .field("policy", &self.policy)
            .field("confirm", &self.confirm)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyDefault;
    use crate::request::ConfirmationId;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers every prompt immediately through the gate.
    struct AnsweringPrompter {
        gate: ConfirmationGate,
        approve: bool,
        seen: Mutex<Vec<ConfirmationPrompt>>,
    }

    #[async_trait]
    impl ConfirmationPrompter for AnsweringPrompter {
        async fn present(&self, prompt: &ConfirmationPrompt) {
            self.seen.lock().unwrap().push(prompt.clone());
            assert!(self.gate.resolve(&prompt.id, self.approve));
        }
    }

    /// Delivers prompts to nobody.
    struct SilentPrompter;

    #[async_trait]
    impl ConfirmationPrompter for SilentPrompter {
        async fn present(&self, _prompt: &ConfirmationPrompt) {}
    }

    fn answering(gate: &ConfirmationGate, approve: bool) -> Arc<AnsweringPrompter> {
        Arc::new(AnsweringPrompter {
            gate: gate.clone(),
            approve,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn payload(script: &str) -> ActionPayload {
        let mut p = ActionPayload::new();
        p.insert("script".to_owned(), script.into());
        p
    }

    #[tokio::test]
    async fn test_internal_action_allowed() {
        let governor = ActionGovernor::new(
            Some(ActionPolicy::new(PolicyDefault::Deny)),
            ConfirmCategories::new(),
            ConfirmationGate::new(),
            Arc::new(SilentPrompter),
        );
        let auth = governor.authorize("launch", &ActionPayload::new()).await;
        assert_eq!(
            auth,
            Authorization::Allowed {
                category: INTERNAL_CATEGORY,
                via: AuthorizedVia::Internal
            }
        );
    }

    #[tokio::test]
    async fn test_policy_allow_and_deny() {
        let policy = ActionPolicy::new(PolicyDefault::Deny).with_allow("get");
        let governor = ActionGovernor::new(
            Some(policy),
            ConfirmCategories::new(),
            ConfirmationGate::new(),
            Arc::new(SilentPrompter),
        );

        let allowed = governor.authorize("gettext", &ActionPayload::new()).await;
        assert_eq!(
            allowed,
            Authorization::Allowed {
                category: "get",
                via: AuthorizedVia::Policy
            }
        );

        let denied = governor.authorize("upload", &ActionPayload::new()).await;
        assert_eq!(
            denied,
            Authorization::Denied {
                category: "upload",
                reason: DenialReason::Policy
            }
        );
        assert!(governor.gate().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_action() {
        let gate = ConfirmationGate::new();
        let prompter = answering(&gate, true);
        let governor = ActionGovernor::new(
            None,
            ConfirmCategories::parse("eval"),
            gate,
            prompter.clone(),
        );

        let auth = governor.authorize("evaluate", &payload("1+1")).await;
        assert_eq!(
            auth,
            Authorization::Allowed {
                category: "eval",
                via: AuthorizedVia::Confirmed
            }
        );

        let seen = prompter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].description, "Evaluate JavaScript: 1+1");
        assert_eq!(seen[0].category, "eval");
    }

    #[tokio::test]
    async fn test_rejected_action() {
        let gate = ConfirmationGate::new();
        let governor = ActionGovernor::new(
            None,
            ConfirmCategories::parse("eval"),
            gate.clone(),
            answering(&gate, false),
        );

        let auth = governor.authorize("evaluate", &payload("1+1")).await;
        assert_eq!(
            auth,
            Authorization::Denied {
                category: "eval",
                reason: DenialReason::Rejected
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_confirmation_times_out_as_rejected() {
        let governor = ActionGovernor::new(
            Some(ActionPolicy::new(PolicyDefault::Allow).with_allow("eval")),
            ConfirmCategories::parse("eval"),
            ConfirmationGate::with_timeout(Duration::from_secs(60)),
            Arc::new(SilentPrompter),
        );

        let auth = governor.authorize("evaluate", &payload("1+1")).await;
        assert_eq!(
            auth,
            Authorization::Denied {
                category: "eval",
                reason: DenialReason::Rejected
            }
        );
        assert!(governor.gate().is_empty());
    }

    #[tokio::test]
    async fn test_presented_prompt_is_the_pending_one() {
        struct CheckingPrompter {
            gate: ConfirmationGate,
            live: Mutex<Option<ConfirmationId>>,
        }

        #[async_trait]
        impl ConfirmationPrompter for CheckingPrompter {
            async fn present(&self, prompt: &ConfirmationPrompt) {
                assert!(self.gate.is_pending(&prompt.id));
                assert_eq!(self.gate.pending(), vec![prompt.clone()]);
                *self.live.lock().unwrap() = Some(prompt.id.clone());
                self.gate.resolve(&prompt.id, true);
            }
        }

        let gate = ConfirmationGate::new();
        let prompter = Arc::new(CheckingPrompter {
            gate: gate.clone(),
            live: Mutex::new(None),
        });
        let governor = ActionGovernor::new(
            None,
            ConfirmCategories::parse("download"),
            gate.clone(),
            prompter.clone(),
        );

        assert!(governor.authorize("download", &ActionPayload::new()).await.is_allowed());
        let id = prompter.live.lock().unwrap().clone().unwrap();
        assert!(!gate.is_pending(&id));
    }

    #[test]
    fn test_authorization_display() {
        let denied = Authorization::Denied {
            category: "eval",
            reason: DenialReason::Policy,
        };
        assert_eq!(denied.to_string(), "denied by policy (eval)");
        assert_eq!(denied.category(), "eval");
        assert!(!denied.is_allowed());
    }
}
