//! Prelude module - commonly used types for convenient import.
//!
//! Use `use steward_approval::prelude::*;` to import all essential types.

// Errors
pub use crate::{ApprovalError, ApprovalResult};

// Classification
pub use crate::{ActionPayload, classify, describe};

// Policy
pub use crate::{ActionPolicy, ConfirmCategories, PolicyDecision, PolicyDefault, decide};

// Confirmation
pub use crate::{ConfirmationGate, ConfirmationId, ConfirmationOutcome, ConfirmationPrompt};

// Pipeline
pub use crate::{ActionGovernor, Authorization, ConfirmationPrompter};
