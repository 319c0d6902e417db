//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Longest permitted confirmation window (one hour).
const MAX_CONFIRM_TIMEOUT_SECS: u64 = 3600;

/// Accepted `logging.format` values.
const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_governance(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_governance(config: &Config) -> ConfigResult<()> {
    let g = &config.governance;

    if !(1..=MAX_CONFIRM_TIMEOUT_SECS).contains(&g.confirm_timeout_secs) {
        return Err(ConfigError::ValidationError {
            field: "governance.confirm_timeout_secs".to_owned(),
            message: format!(
                "confirm_timeout_secs must be between 1 and {MAX_CONFIRM_TIMEOUT_SECS}, got {}",
                g.confirm_timeout_secs
            ),
        });
    }

    if g.policy_file
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "governance.policy_file".to_owned(),
            message: "policy_file must not be empty; omit it to run without a policy".to_owned(),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if l.level.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: "log level must not be empty".to_owned(),
        });
    }

    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = Config::default();
        config.governance.confirm_timeout_secs = 0;
        assert_eq!(field_of(validate(&config)), "governance.confirm_timeout_secs");

        config.governance.confirm_timeout_secs = 3601;
        assert_eq!(field_of(validate(&config)), "governance.confirm_timeout_secs");

        config.governance.confirm_timeout_secs = 3600;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_policy_path_rejected() {
        let mut config = Config::default();
        config.governance.policy_file = Some(PathBuf::new());
        assert_eq!(field_of(validate(&config)), "governance.policy_file");
    }

    #[test]
    fn test_log_format_and_level() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");

        let mut config = Config::default();
        config.logging.level = "  ".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");

        let mut config = Config::default();
        config.logging.level = "steward_approval=debug".to_owned();
        config.logging.format = "json".to_owned();
        assert!(validate(&config).is_ok());
    }
}
