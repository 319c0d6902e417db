//! Global subscriber installation. Lives in its own test binary because the
//! subscriber is process-wide.

use steward_telemetry::{LogConfig, LogFormat, TelemetryError, setup_logging};

#[test]
fn test_second_initialisation_is_an_error() {
    let config = LogConfig::new("info")
        .with_format(LogFormat::Json)
        .with_directive("steward_approval=debug");

    setup_logging(&config).unwrap();
    tracing::info!(action = "click", "logging ready");

    assert!(matches!(
        setup_logging(&LogConfig::default()),
        Err(TelemetryError::InitError(_))
    ));
}
