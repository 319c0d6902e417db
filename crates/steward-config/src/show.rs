//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path → which layer set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded, lowest precedence first.
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON.
    Json,
}

impl ResolvedConfig {
    /// Render the resolved config, optionally limited to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or `section` does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(section),
            ShowFormat::Json => {
                let value = self.section_value(section)?;
                serde_json::to_string_pretty(&value).map_err(|_| fmt::Error)
            },
        }
    }

    fn section_value(&self, section: Option<&str>) -> Result<toml::Value, fmt::Error> {
        let value = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        match section {
            None => Ok(value),
            Some(name) => value.get(name).cloned().ok_or(fmt::Error),
        }
    }

    fn show_toml(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        let body = toml::to_string_pretty(&self.section_value(section)?).map_err(|_| fmt::Error)?;

        let mut output = String::new();
        output.push_str("# Resolved Steward configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [workspace] [env]\n");
        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        // Table headers reset the dotted prefix for the keys below them.
        let mut table = section.unwrap_or("").to_owned();
        for line in body.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                table = match section {
                    Some(s) => format!("{s}.{header}"),
                    None => header.to_owned(),
                };
            }

            match self.annotate(trimmed, &table) {
                Some(layer) => writeln!(output, "{line}  # [{layer}]")?,
                None => writeln!(output, "{line}")?,
            }
        }

        Ok(output)
    }

    /// Source annotation for a `key = value` line under `table`.
    fn annotate(&self, line: &str, table: &str) -> Option<String> {
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            return None;
        }
        let key = line.split('=').next()?.trim();
        let path = if table.is_empty() {
            key.to_owned()
        } else {
            format!("{table}.{key}")
        };
        self.field_sources.get(&path).map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    fn resolved() -> ResolvedConfig {
        let mut field_sources = FieldSources::new();
        field_sources.insert("governance.confirm_timeout_secs".to_owned(), ConfigLayer::User);
        field_sources.insert("logging.level".to_owned(), ConfigLayer::Environment);
        field_sources.insert("logging.format".to_owned(), ConfigLayer::Defaults);

        let mut config = Config::default();
        config.governance.confirm_timeout_secs = 30;
        config.logging.level = "debug".to_owned();

        ResolvedConfig {
            config,
            field_sources,
            loaded_files: vec!["/home/me/.steward/config.toml".to_owned()],
        }
    }

    #[test]
    fn test_toml_annotated() {
        let out = resolved().show(ShowFormat::Toml, None).unwrap();
        assert!(out.contains("1. /home/me/.steward/config.toml"));
        assert!(out.contains("confirm_timeout_secs = 30  # [user]"));
        assert!(out.contains("level = \"debug\"  # [env]"));
        assert!(out.contains("format = \"compact\"  # [defaults]"));
    }

    #[test]
    fn test_section_only() {
        let out = resolved().show(ShowFormat::Toml, Some("logging")).unwrap();
        assert!(out.contains("level = \"debug\"  # [env]"));
        assert!(!out.contains("confirm_timeout_secs"));
    }

    #[test]
    fn test_json() {
        let out = resolved().show(ShowFormat::Json, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["governance"]["confirm_timeout_secs"], 30);
    }

    #[test]
    fn test_unknown_section_errors() {
        assert!(resolved().show(ShowFormat::Json, Some("nope")).is_err());
    }
}
