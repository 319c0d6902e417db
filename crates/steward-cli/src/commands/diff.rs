//! `steward diff` - compare two page snapshots.

use std::path::Path;

use anyhow::{Context, Result};
use steward_verify::{SnapshotDiff, diff_lines};

use crate::formatter::{OutputFormat, emit_json};
use crate::theme::Theme;

fn read_snapshot(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))
}

/// Diff the snapshot at `before` against the one at `after`.
pub(crate) fn run_diff(before: &Path, after: &Path, format: OutputFormat) -> Result<()> {
    let before = read_snapshot(before)?;
    let after = read_snapshot(after)?;

    match format {
        OutputFormat::Json => emit_json(&steward_verify::diff_snapshots(&before, &after))?,
        OutputFormat::Pretty => {
            let lines = diff_lines(&before, &after);
            println!("{}", Theme::header("Snapshot diff"));
            for line in &lines {
                println!("{}", Theme::diff_line(line));
            }
            let summary: SnapshotDiff = lines.into_iter().collect();
            println!("{}", Theme::separator());
            if summary.changed {
                println!("{}", Theme::warning(&summary.summary()));
            } else {
                println!("{}", Theme::success("No changes"));
            }
        },
    }
    Ok(())
}
