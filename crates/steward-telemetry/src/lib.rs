//! Steward Telemetry - logging setup for the Steward tools.
//!
//! # Example
//!
//! ```rust,no_run
//! use steward_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), steward_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("steward_approval=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!(action = "click", "governing action");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_logging};
