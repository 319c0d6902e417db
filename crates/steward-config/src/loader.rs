//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge the user config (`~/.steward/config.toml`)
//! 3. Merge `{workspace}/.steward/config.toml`
//! 4. Apply env var fallbacks for fields no file set
//! 5. Deserialize the merged tree → `Config`
//! 6. Validate

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Directory under the home directory holding the user config.
const STEWARD_DIR: &str = ".steward";

/// Load configuration with layered file precedence.
///
/// `workspace_root` is the root of the current project; if `None` the
/// workspace layer is skipped. `steward_home_override` replaces
/// `~/.steward` for user-level discovery.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load(
    workspace_root: Option<&Path>,
    steward_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let env_vars = collect_env_vars();
    let steward_home = match steward_home_override {
        Some(home) => home.to_path_buf(),
        None => home_directory()?.join(STEWARD_DIR),
    };
    load_layers(workspace_root, &steward_home, |merged, sources| {
        apply_env_fallbacks(merged, sources, &env_vars)
    })
}

/// Shared layering, with env application injected so tests stay hermetic.
fn load_layers<F>(
    workspace_root: Option<&Path>,
    steward_home: &Path,
    apply_env: F,
) -> ConfigResult<ResolvedConfig>
where
    F: FnOnce(&mut toml::Value, &mut FieldSources) -> usize,
{
    // 1. Embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    // 2-3. User then workspace.
    let mut layers = vec![(steward_home.join("config.toml"), ConfigLayer::User)];
    if let Some(ws_root) = workspace_root {
        layers.push((
            ws_root.join(STEWARD_DIR).join("config.toml"),
            ConfigLayer::Workspace,
        ));
    }

    for (path, layer) in layers {
        if let Some(overlay) = try_load_file(&path)? {
            deep_merge(&mut merged, &overlay, "", layer, &mut field_sources);
            info!(path = %path.display(), %layer, "loaded config");
            loaded_files.push(path.display().to_string());
        }
    }

    // 4. Env fallbacks.
    let env_count = apply_env(&mut merged, &mut field_sources);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering).
///
/// Fields the file omits take their default values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let Some(value) = try_load_file(path)? else {
        return Err(ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    };

    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Reads once and checks the size afterwards, so there is no window between
/// a metadata check and the read.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len(),
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &mut toml::Value, _: &mut FieldSources) -> usize {
        0
    }

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_deserialize_to_default_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_defaults_only() {
        let home = tempfile::tempdir().unwrap();
        let resolved = load_layers(None, home.path(), no_env).unwrap();

        assert_eq!(resolved.config, Config::default());
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(
            resolved.field_sources.get("governance.confirm_timeout_secs"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_workspace_overrides_user() {
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        write(
            home.path(),
            "config.toml",
            "[governance]\nconfirm_timeout_secs = 30\nconfirm_actions = [\"eval\"]\n",
        );
        write(
            ws.path(),
            ".steward/config.toml",
            "[governance]\nconfirm_actions = [\"upload\"]\n",
        );

        let resolved = load_layers(Some(ws.path()), home.path(), no_env).unwrap();

        assert_eq!(resolved.config.governance.confirm_timeout_secs, 30);
        assert_eq!(resolved.config.governance.confirm_actions, ["upload"]);
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(
            resolved.field_sources.get("governance.confirm_timeout_secs"),
            Some(&ConfigLayer::User)
        );
        assert_eq!(
            resolved.field_sources.get("governance.confirm_actions"),
            Some(&ConfigLayer::Workspace)
        );
    }

    #[test]
    fn test_env_applied_after_files() {
        let home = tempfile::tempdir().unwrap();
        write(home.path(), "config.toml", "[logging]\nlevel = \"warn\"\n");

        let resolved = load_layers(None, home.path(), |merged, sources| {
            let env: HashMap<String, String> = [
                ("STEWARD_LOG_LEVEL".to_owned(), "trace".to_owned()),
                ("STEWARD_ALLOWED_DOMAINS".to_owned(), "example.com".to_owned()),
            ]
            .into_iter()
            .collect();
            apply_env_fallbacks(merged, sources, &env)
        })
        .unwrap();

        assert_eq!(resolved.config.logging.level, "warn");
        assert_eq!(resolved.config.governance.allowed_domains, ["example.com"]);
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let home = tempfile::tempdir().unwrap();
        write(home.path(), "config.toml", "[governance]\nconfirm_timeout_secs = 0\n");

        let result = load_layers(None, home.path(), no_env);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "governance.confirm_timeout_secs"
        ));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let home = tempfile::tempdir().unwrap();
        write(home.path(), "config.toml", "[governance\n");
        assert!(matches!(
            load_layers(None, home.path(), no_env),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_file_single() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "steward.toml",
            "[governance]\npolicy_file = \"policy.json\"\n",
        );

        let config = load_file(&path).unwrap();
        assert_eq!(
            config.governance.policy_file.as_deref(),
            Some(Path::new("policy.json"))
        );
        assert_eq!(config.logging, crate::types::LoggingSection::default());
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        assert!(matches!(
            try_load_file(&file_path),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
