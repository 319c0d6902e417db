//! CLI commands.

pub(crate) mod check;
pub(crate) mod classify;
pub(crate) mod config;
pub(crate) mod diff;
pub(crate) mod domain;
pub(crate) mod run;

use anyhow::{Result, bail};
use steward_approval::ActionPayload;

/// Parse a `--payload` argument. Absent means an empty payload.
pub(crate) fn parse_payload(raw: Option<&str>) -> Result<ActionPayload> {
    let Some(raw) = raw else {
        return Ok(ActionPayload::new());
    };
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        other => bail!("payload must be a JSON object, got {other}"),
    }
}
