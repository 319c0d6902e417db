/// Errors that can occur while loading governance configuration.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    /// The action policy file could not be read.
    #[error("failed to read action policy at {path}: {source}")]
    PolicyRead {
        /// Path to the policy file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The action policy is not valid JSON or has the wrong shape.
    #[error("failed to parse action policy at {path}: {source}")]
    PolicyParse {
        /// Path to the policy file (`<inline>` for in-memory sources).
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The policy's `default` field is missing or not `allow`/`deny`.
    #[error("invalid action policy: \"default\" must be \"allow\" or \"deny\", got {found}")]
    InvalidPolicyDefault {
        /// JSON rendering of the offending value.
        found: String,
    },

    /// The policy file exceeds the size limit.
    #[error("action policy at {path} is {size} bytes, exceeding the {limit} byte limit")]
    PolicyTooLarge {
        /// Path to the policy file.
        path: String,
        /// Actual size in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        limit: u64,
    },
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;
