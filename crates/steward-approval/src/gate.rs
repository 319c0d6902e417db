//! Confirmation gate - parks actions until a human answers.
//!
//! The [`ConfirmationGate`] owns the registry of pending confirmations. Each
//! [`request`](ConfirmationGate::request) registers an entry, arms a timer,
//! and hands back a [`ConfirmationOutcome`] that settles exactly once:
//!
//! - **Resolution**: an approval channel calls
//!   [`resolve`](ConfirmationGate::resolve) with the user's answer.
//! - **Timeout**: the wait window elapses and the entry auto-denies.
//!
//! Whichever path removes the registry entry first owns the settlement; the
//! other finds nothing and does nothing. Silence is never approval.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ActionPayload;
use crate::request::{ConfirmationId, ConfirmationPrompt};

/// Default wait window before a confirmation auto-denies (60 seconds).
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// One outstanding approval request.
struct PendingConfirmation {
    prompt: ConfirmationPrompt,
    payload: ActionPayload,
    reply: oneshot::Sender<bool>,
    timer: JoinHandle<()>,
}

impl PendingConfirmation {
    /// Cancel the timer and deliver the verdict.
    ///
    /// The caller must already have removed the entry from the registry.
    fn settle(self, approved: bool) {
        self.timer.abort();
        // The requester may have stopped listening; the entry is gone either way.
        let _ = self.reply.send(approved);
    }
}

type Registry = HashMap<ConfirmationId, PendingConfirmation>;

/// Registry of pending confirmations with bounded waits.
///
/// Cloning a gate yields another handle to the same registry. Independent
/// gates (e.g. one per test) share nothing.
///
/// Every operation must run inside a Tokio runtime.
///
/// # Example
///
/// ```
/// use steward_approval::{ActionPayload, ConfirmationGate};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gate = ConfirmationGate::new();
/// let (id, outcome) = gate.request("evaluate", "eval", "Evaluate JavaScript", ActionPayload::new());
///
/// assert!(gate.is_pending(&id));
/// assert!(gate.resolve(&id, true));
/// assert!(outcome.await);
///
/// // Already settled: a second answer is a no-op.
/// assert!(!gate.resolve(&id, false));
/// # }
/// ```
#[derive(Clone)]
pub struct ConfirmationGate {
    pending: Arc<Mutex<Registry>>,
    timeout: Duration,
}

impl ConfirmationGate {
    /// Create a gate with the default 60 second wait window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_CONFIRM_TIMEOUT)
    }

    /// Create a gate with a custom wait window.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// The wait window applied to new requests.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register a pending confirmation and start its timer.
    ///
    /// Returns the identifier to surface to the approver and an outcome that
    /// resolves to `true` only on explicit approval.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn request(
        &self,
        action: &str,
        category: &str,
        description: impl Into<String>,
        payload: ActionPayload,
    ) -> (ConfirmationId, ConfirmationOutcome) {
        let (tx, rx) = oneshot::channel();

        // The timer cannot claim the entry before it is inserted: it needs
        // this same lock.
        let mut pending = lock(&self.pending);

        let mut id = ConfirmationId::generate();
        while pending.contains_key(&id) {
            id = ConfirmationId::generate();
        }

        let prompt = ConfirmationPrompt::new(id.clone(), action, category, description);
        let timer = tokio::spawn(expire(
            Arc::clone(&self.pending),
            id.clone(),
            self.timeout,
        ));

        pending.insert(
            id.clone(),
            PendingConfirmation {
                prompt,
                payload,
                reply: tx,
                timer,
            },
        );
        drop(pending);

        info!(
            confirmation_id = %id,
            action,
            category,
            timeout_secs = self.timeout.as_secs(),
            "confirmation requested"
        );

        (id, ConfirmationOutcome { rx })
    }

    /// Settle a pending confirmation with the approver's answer.
    ///
    /// Returns `false` when the identifier is unknown, already resolved, or
    /// already timed out. Never settles an outcome twice.
    pub fn resolve(&self, id: &ConfirmationId, approved: bool) -> bool {
        let Some(entry) = lock(&self.pending).remove(id) else {
            debug!(confirmation_id = %id, "no pending confirmation to resolve");
            return false;
        };

        info!(
            confirmation_id = %id,
            action = %entry.prompt.action,
            approved,
            "confirmation resolved"
        );
        entry.settle(approved);
        true
    }

    /// Whether an identifier refers to a live confirmation.
    #[must_use]
    pub fn is_pending(&self, id: &ConfirmationId) -> bool {
        lock(&self.pending).contains_key(id)
    }

    /// Prompts for all live confirmations, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<ConfirmationPrompt> {
        let mut prompts: Vec<_> = lock(&self.pending)
            .values()
            .map(|entry| entry.prompt.clone())
            .collect();
        prompts.sort_by_key(|p| p.requested_at);
        prompts
    }

    /// The stored prompt of a live confirmation.
    #[must_use]
    pub fn prompt(&self, id: &ConfirmationId) -> Option<ConfirmationPrompt> {
        lock(&self.pending).get(id).map(|entry| entry.prompt.clone())
    }

    /// The original payload of a live confirmation.
    #[must_use]
    pub fn payload(&self, id: &ConfirmationId) -> Option<ActionPayload> {
        lock(&self.pending).get(id).map(|entry| entry.payload.clone())
    }

    /// Number of live confirmations.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Whether no confirmations are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.pending).is_empty()
    }

    /// Deny every outstanding confirmation and cancel their timers.
    ///
    /// Returns how many were denied. The gate remains usable.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<_> = lock(&self.pending).drain().map(|(_, entry)| entry).collect();
        let count = drained.len();
        for entry in drained {
            entry.settle(false);
        }
        if count > 0 {
            info!(count, "denied outstanding confirmations on shutdown");
        }
        count
    }
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfirmationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("timeout", &self.timeout)
            .field("pending", &self.len())
            .finish()
    }
}

/// Timer body: auto-deny once the window elapses, unless resolved first.
async fn expire(registry: Arc<Mutex<Registry>>, id: ConfirmationId, timeout: Duration) {
    tokio::time::sleep(timeout).await;

    let Some(entry) = lock(&registry).remove(&id) else {
        return;
    };

    warn!(
        confirmation_id = %id,
        action = %entry.prompt.action,
        "confirmation timed out, auto-denying"
    );
    // This task is the timer; nothing left to cancel.
    let _ = entry.reply.send(false);
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(|e| {
        warn!("confirmation registry lock poisoned, recovering");
        e.into_inner()
    })
}

/// The eventual answer to a confirmation request.
///
/// Resolves to `true` only on explicit approval. Denial, timeout, and gate
/// shutdown all resolve to `false`.
#[derive(Debug)]
#[must_use = "an outcome does nothing unless awaited"]
pub struct ConfirmationOutcome {
    rx: oneshot::Receiver<bool>,
}

impl Future for ConfirmationOutcome {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(false))
    }
}
