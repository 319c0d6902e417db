//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only fill fields that no
//! config file set. Embedded defaults do not count as set.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `STEWARD_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "STEWARD_ACTION_POLICY",
        field_path: "governance.policy_file",
    },
    EnvMapping {
        var_name: "STEWARD_CONFIRM_ACTIONS",
        field_path: "governance.confirm_actions",
    },
    EnvMapping {
        var_name: "STEWARD_CONFIRM_TIMEOUT_SECS",
        field_path: "governance.confirm_timeout_secs",
    },
    EnvMapping {
        var_name: "STEWARD_ALLOWED_DOMAINS",
        field_path: "governance.allowed_domains",
    },
    EnvMapping {
        var_name: "STEWARD_LOG_LEVEL",
        field_path: "logging.level",
    },
];

/// Apply environment variable fallbacks to fields no config file set.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        let set_by_file = sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults);
        if set_by_file {
            continue;
        }

        let Some(val) = env_vars.get(mapping.var_name) else {
            continue;
        };
        if val.trim().is_empty() {
            continue;
        }

        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        set_field(merged, mapping.field_path, coerce_to_toml_value(mapping.field_path, val));
        sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
        count = count.saturating_add(1);
    }

    count
}

/// Set a dotted field in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry(segment)
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert(leaf.to_owned(), value);
    }
}

/// Coerce a string env var value to the TOML type its field expects.
///
/// Values that fail to parse stay strings, so deserialization reports the
/// bad field instead of it being silently dropped.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    match path {
        "governance.confirm_actions" | "governance.allowed_domains" => toml::Value::Array(
            val.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_owned()))
                .collect(),
        ),
        "governance.confirm_timeout_secs" => val
            .trim()
            .parse::<i64>()
            .map_or_else(|_| toml::Value::String(val.to_owned()), toml::Value::Integer),
        _ => toml::Value::String(val.to_owned()),
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn empty_tree() -> toml::Value {
        toml::Value::Table(toml::map::Map::new())
    }

    #[test]
    fn test_env_fills_unset_fields() {
        let mut merged = empty_tree();
        let mut sources = FieldSources::new();
        let env = make_env(&[
            ("STEWARD_ACTION_POLICY", "/etc/steward/policy.json"),
            ("STEWARD_CONFIRM_ACTIONS", "eval, upload,,"),
            ("STEWARD_CONFIRM_TIMEOUT_SECS", "30"),
        ]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 3);
        assert_eq!(
            merged["governance"]["policy_file"].as_str(),
            Some("/etc/steward/policy.json")
        );
        let actions = merged["governance"]["confirm_actions"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].as_str(), Some("upload"));
        assert_eq!(merged["governance"]["confirm_timeout_secs"].as_integer(), Some(30));
        assert_eq!(
            sources.get("governance.confirm_actions"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);

        apply_env_fallbacks(
            &mut merged,
            &mut sources,
            &make_env(&[("STEWARD_LOG_LEVEL", "debug")]),
        );

        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
    }

    #[test]
    fn test_env_never_overrides_files() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let count = apply_env_fallbacks(
            &mut merged,
            &mut sources,
            &make_env(&[("STEWARD_LOG_LEVEL", "trace")]),
        );

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut merged = empty_tree();
        let mut sources = FieldSources::new();
        let count = apply_env_fallbacks(
            &mut merged,
            &mut sources,
            &make_env(&[("STEWARD_ACTION_POLICY", "  ")]),
        );
        assert_eq!(count, 0);
        assert!(sources.is_empty());
    }

    #[test]
    fn test_unparseable_timeout_stays_string() {
        assert_eq!(
            coerce_to_toml_value("governance.confirm_timeout_secs", "soon"),
            toml::Value::String("soon".to_owned())
        );
    }
}
