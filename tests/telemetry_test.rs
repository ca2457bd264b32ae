//! Telemetry module tests for Coherence Core.

use coherence_core::telemetry::metrics::{
    init_metrics, record_invalidations, record_policy_violation, record_transfer,
};
use coherence_core::telemetry::{init_logging, LaunchSpan, LogConfig, LogError, LogFormat, SpanExt};
use coherence_core::{BufferDescriptor, DeviceQueue, QueueRef, SimQueue, SyncMode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Span;

// =============================================================================
// LogConfig Tests
// =============================================================================

#[test]
fn log_config_default_is_json() {
    let config = LogConfig::default();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "info");
    assert!(config.output_path.is_none());
}

#[test]
fn log_config_with_output_path() {
    let config = LogConfig {
        format: LogFormat::Json,
        level: "trace".to_string(),
        output_path: Some(PathBuf::from("/tmp/test.log")),
    };
    assert_eq!(config.output_path, Some(PathBuf::from("/tmp/test.log")));
}

// =============================================================================
// LogError Tests
// =============================================================================

#[test]
fn log_error_file_open_display() {
    let error = LogError::FileOpen("permission denied".to_string());
    assert!(error.to_string().contains("Failed to open log file"));
    assert!(error.to_string().contains("permission denied"));
}

#[test]
fn log_error_already_initialized_display() {
    let error = LogError::AlreadyInitialized;
    assert!(error.to_string().contains("already initialized"));
}

// =============================================================================
// Logging Initialization
// =============================================================================

// The only test in this binary that installs a global subscriber.
#[test]
fn json_logging_to_file_captures_transfer_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coherence.log");
    let config = LogConfig {
        format: LogFormat::Json,
        level: "coherence_core=debug".to_string(),
        output_path: Some(path.clone()),
    };
    init_logging(&config).unwrap();
    let again = LogConfig { format: LogFormat::Pretty, ..LogConfig::default() };
    assert!(matches!(init_logging(&again), Err(LogError::AlreadyInitialized)));

    let a: QueueRef = Arc::new(SimQueue::accelerator(0, 1024));
    let b: QueueRef = Arc::new(SimQueue::accelerator(1, 1024));
    let desc = BufferDescriptor::new(a, &[1; 8], true).unwrap();
    desc.sync(&b, SyncMode::read()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("transfer"));
    assert!(contents.contains(&b.device_path().to_string()));
}

// =============================================================================
// Span Tests
// =============================================================================

#[test]
fn span_ext_record_result_ok() {
    let span = Span::none();
    let result: Result<i32, &str> = Ok(42);
    span.record_result(&result);
}

#[test]
fn span_ext_record_result_err() {
    let span = Span::none();
    let result: Result<i32, &str> = Err("test error");
    span.record_result(&result);
}

#[test]
fn launch_span_creates_span_without_panic() {
    let span = LaunchSpan::new("appender", "sim:0", 3);
    let _guard = span.enter();
    span.record_result(&Ok::<(), &str>(()));
}

// =============================================================================
// Metrics Tests
// =============================================================================

#[test]
fn metrics_init_no_panic() {
    init_metrics();
    init_metrics();
}

#[test]
fn metrics_record_without_recorder() {
    record_transfer(4096);
    record_transfer(0);
    record_invalidations(3);
    record_policy_violation();
}
