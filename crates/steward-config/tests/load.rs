//! Layered loading through the public API.

use std::fs;

use steward_config::{Config, ConfigError, ConfigLayer, ShowFormat};

#[test]
fn test_user_and_workspace_layers() {
    let home = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();

    fs::write(
        home.path().join("config.toml"),
        r#"
[governance]
policy_file = "/srv/steward/policy.json"
confirm_actions = ["eval", "upload"]

[logging]
format = "json"
"#,
    )
    .unwrap();

    fs::create_dir_all(workspace.path().join(".steward")).unwrap();
    fs::write(
        workspace.path().join(".steward/config.toml"),
        r#"
[governance]
confirm_timeout_secs = 15
allowed_domains = ["*.example.com"]
"#,
    )
    .unwrap();

    let resolved = Config::load_with_home(Some(workspace.path()), home.path()).unwrap();
    let governance = &resolved.config.governance;

    assert_eq!(governance.confirm_timeout_secs, 15);
    assert_eq!(governance.allowed_domains, ["*.example.com"]);
    assert_eq!(
        governance.confirm_categories().into_iter().collect::<Vec<_>>(),
        ["eval", "upload"]
    );
    assert_eq!(resolved.config.logging.format, "json");
    assert_eq!(resolved.loaded_files.len(), 2);
    assert_eq!(
        resolved.field_sources.get("governance.policy_file"),
        Some(&ConfigLayer::User)
    );

    let shown = resolved.show(ShowFormat::Toml, Some("governance")).unwrap();
    assert!(shown.contains("confirm_timeout_secs = 15  # [workspace]"));
}

#[test]
fn test_invalid_format_is_reported_with_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("steward.toml");
    fs::write(&path, "[logging]\nformat = \"yaml\"\n").unwrap();

    match Config::load_file(&path) {
        Err(ConfigError::ValidationError { field, message }) => {
            assert_eq!(field, "logging.format");
            assert!(message.contains("yaml"));
        },
        other => panic!("expected validation error, got {other:?}"),
    }
}
