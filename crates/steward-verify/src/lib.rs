//! Steward Verify - what changed on the page after an action ran.
//!
//! Compares two accessibility snapshots line by line and reports the drift as
//! counts plus a readable listing.
//!
//! # Example
//!
//! ```
//! use steward_verify::diff_snapshots;
//!
//! let diff = diff_snapshots("heading \"Hello\"", "heading \"Hello\"\nbutton \"New\"");
//!
//! assert!(diff.changed);
//! assert_eq!((diff.additions, diff.removals, diff.unchanged), (1, 0, 1));
//! assert_eq!(diff.diff, "  heading \"Hello\"\n+ button \"New\"");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod align;
pub mod diff;

pub use diff::{DiffLine, SnapshotDiff, diff_lines, diff_snapshots};
