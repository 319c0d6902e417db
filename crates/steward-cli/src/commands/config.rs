//! CLI handlers for the `steward config` subcommand.

use anyhow::Result;
use steward_config::{ResolvedConfig, ShowFormat};

use crate::formatter::OutputFormat;

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(
    resolved: &ResolvedConfig,
    section: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let show_format = match format {
        OutputFormat::Json => ShowFormat::Json,
        OutputFormat::Pretty => ShowFormat::Toml,
    };

    let output = resolved.show(show_format, section).map_err(|_| match section {
        Some(name) => anyhow::anyhow!("no configuration section named '{name}'"),
        None => anyhow::anyhow!("failed to format config"),
    })?;

    println!("{output}");
    Ok(())
}
