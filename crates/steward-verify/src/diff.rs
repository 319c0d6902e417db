//! Snapshot diffs.
//!
//! Both snapshots are split on `\n` into lines, so an empty snapshot is one
//! empty line. Lines are aligned by a longest common subsequence: unrelated
//! lines at the same position are never paired up, and a changed line shows
//! as a removal followed by an addition.

use serde::Serialize;
use std::fmt;

use crate::align::align;

/// One entry of a line diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "line", rename_all = "lowercase")]
pub enum DiffLine {
    /// Present in both snapshots.
    Unchanged(String),
    /// Present only after the action.
    Added(String),
    /// Present only before the action.
    Removed(String),
}

impl DiffLine {
    /// The two-character marker this entry is rendered with.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Unchanged(_) => "  ",
            Self::Added(_) => "+ ",
            Self::Removed(_) => "- ",
        }
    }

    /// The line text, without marker.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Unchanged(text) | Self::Added(text) | Self::Removed(text) => text,
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.text())
    }
}

/// Result of comparing two snapshots.
///
/// `additions + removals + unchanged` equals the number of lines in `diff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    /// Whether anything was added or removed.
    pub changed: bool,
    /// Lines present only after.
    pub additions: usize,
    /// Lines present only before.
    pub removals: usize,
    /// Lines present in both.
    pub unchanged: usize,
    /// Prefixed lines joined by `\n`, no trailing newline.
    pub diff: String,
}

impl SnapshotDiff {
    /// One-line count summary, e.g. `3 additions, 1 removal, 12 unchanged`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {}, {} {}, {} unchanged",
            self.additions,
            plural(self.additions, "addition", "additions"),
            self.removals,
            plural(self.removals, "removal", "removals"),
            self.unchanged,
        )
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

impl FromIterator<DiffLine> for SnapshotDiff {
    fn from_iter<I: IntoIterator<Item = DiffLine>>(iter: I) -> Self {
        let mut result = Self {
            changed: false,
            additions: 0,
            removals: 0,
            unchanged: 0,
            diff: String::new(),
        };

        for (i, line) in iter.into_iter().enumerate() {
            match line {
                DiffLine::Unchanged(_) => result.unchanged = result.unchanged.saturating_add(1),
                DiffLine::Added(_) => result.additions = result.additions.saturating_add(1),
                DiffLine::Removed(_) => result.removals = result.removals.saturating_add(1),
            }
            if i > 0 {
                result.diff.push('\n');
            }
            result.diff.push_str(line.prefix());
            result.diff.push_str(line.text());
        }

        result.changed = result.additions > 0 || result.removals > 0;
        result
    }
}

/// Align two snapshots line by line.
#[must_use]
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffLine> {
    align(before, after)
}

/// Compare two snapshots and report what changed.
///
/// Never fails; any two texts produce a result.
#[must_use]
pub fn diff_snapshots(before: &str, after: &str) -> SnapshotDiff {
    let result: SnapshotDiff = diff_lines(before, after).into_iter().collect();
    tracing::debug!(
        changed = result.changed,
        additions = result.additions,
        removals = result.removals,
        unchanged = result.unchanged,
        "snapshot diff computed"
    );
    result
}
