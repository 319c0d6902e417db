//! Steward CLI - governance and verification for browser-agent actions.
//!
//! Exposes the classifier, policy engine, confirmation flow, snapshot differ,
//! and domain allowlist to operators and scripts.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use steward_config::{ConfigResult, ResolvedConfig};

mod commands;
mod config_bridge;
mod formatter;
mod theme;

use commands::{check, classify, config, diff, domain, run};
use config_bridge::GovernanceOverrides;
use formatter::OutputFormat;

/// Steward - governance for autonomous browser actions
#[derive(Parser)]
#[command(name = "steward")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category of an action
    Classify {
        /// Action name (e.g. `evaluate`)
        action: String,
    },

    /// Print the confirmation prompt text for an action
    Describe {
        /// Action name
        action: String,
        /// Action payload as a JSON object
        #[arg(long)]
        payload: Option<String>,
    },

    /// Print the policy decision for an action
    Check {
        /// Action name
        action: String,
        /// Action policy file (overrides configuration)
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Comma-separated categories that need confirmation
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Govern an action, asking for confirmation on this terminal if needed
    Run {
        /// Action name
        action: String,
        /// Action payload as a JSON object
        #[arg(long)]
        payload: Option<String>,
        /// Action policy file (overrides configuration)
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Comma-separated categories that need confirmation
        #[arg(long)]
        confirm: Option<String>,
        /// Seconds to wait for an answer before denying (1-3600)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
        timeout: Option<u64>,
        /// Comma-separated navigation allowlist
        #[arg(long)]
        allow: Option<String>,
    },

    /// Diff two page snapshots
    Diff {
        /// Snapshot taken before the action
        before: PathBuf,
        /// Snapshot taken after the action
        after: PathBuf,
    },

    /// Check a URL against the navigation allowlist
    Domain {
        /// URL to check
        url: String,
        /// Comma-separated allowlist (overrides configuration)
        #[arg(long)]
        allow: Option<String>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration with the layer that set each field
    Show {
        /// Only show one section (e.g. `governance`)
        #[arg(short, long)]
        section: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let workspace_root = std::env::current_dir().ok();
    let loaded = steward_config::Config::load(workspace_root.as_deref());

    // Set up logging from config, with --verbose override.
    let mut log_config = match &loaded {
        Ok(resolved) => config_bridge::to_log_config(&resolved.config),
        Err(_) => steward_telemetry::LogConfig::default(),
    };
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = steward_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    dispatch(cli.command, cli.format, &loaded).await
}

async fn dispatch(
    command: Commands,
    format: OutputFormat,
    loaded: &ConfigResult<ResolvedConfig>,
) -> Result<ExitCode> {
    match command {
        Commands::Classify { action } => classify::run_classify(&action, format)?,
        Commands::Describe { action, payload } => {
            classify::run_describe(&action, payload.as_deref(), format)?;
        },
        Commands::Check {
            action,
            policy,
            confirm,
        } => {
            let overrides = GovernanceOverrides {
                policy,
                confirm,
                ..GovernanceOverrides::default()
            };
            let governance = config_bridge::governance(loaded_config(loaded)?, &overrides)?;
            check::run_check(&action, &governance, format)?;
        },
        Commands::Run {
            action,
            payload,
            policy,
            confirm,
            timeout,
            allow,
        } => {
            let overrides = GovernanceOverrides {
                policy,
                confirm,
                timeout_secs: timeout,
                allow,
            };
            let governance = config_bridge::governance(loaded_config(loaded)?, &overrides)?;
            return run::run_action(&action, payload.as_deref(), governance, format).await;
        },
        Commands::Diff { before, after } => diff::run_diff(&before, &after, format)?,
        Commands::Domain { url, allow } => {
            let allowlist = match allow {
                Some(raw) => steward_approval::DomainAllowlist::parse(&raw),
                None => steward_approval::DomainAllowlist::new(
                    &loaded_config(loaded)?.governance.allowed_domains,
                ),
            };
            domain::run_domain(&url, &allowlist, format)?;
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { section } => {
                let resolved = loaded
                    .as_ref()
                    .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
                config::show_config(resolved, section.as_deref(), format)?;
            },
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn loaded_config(loaded: &ConfigResult<ResolvedConfig>) -> Result<&steward_config::Config> {
    loaded
        .as_ref()
        .map(|resolved| &resolved.config)
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "steward",
            "--format",
            "json",
            "run",
            "evaluate",
            "--payload",
            r#"{"script":"1+1"}"#,
            "--confirm",
            "eval",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Run {
                action,
                confirm,
                timeout,
                ..
            } => {
                assert_eq!(action, "evaluate");
                assert_eq!(confirm.as_deref(), Some("eval"));
                assert_eq!(timeout, Some(5));
            },
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_timeout_out_of_range_rejected() {
        for timeout in ["0", "3601"] {
            let result = Cli::try_parse_from(["steward", "run", "evaluate", "--timeout", timeout]);
            assert!(result.is_err(), "--timeout {timeout} should be rejected");
        }

        let cli =
            Cli::try_parse_from(["steward", "run", "evaluate", "--timeout", "3600"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                timeout: Some(3600),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_diff() {
        let cli = Cli::try_parse_from(["steward", "diff", "a.txt", "b.txt", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Diff { .. }));
    }
}
