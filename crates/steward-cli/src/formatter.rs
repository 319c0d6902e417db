//! Output format selection and machine-readable output.

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Colored human-readable output.
    Pretty,
    /// One JSON document on stdout.
    Json,
}

/// Write `value` to stdout as a single line of JSON.
pub(crate) fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{json}")?;
    Ok(())
}
