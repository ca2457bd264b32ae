//! Pretty log output routed to a file.
//!
//! Kept in its own test binary: it installs the global subscriber.

use coherence_core::telemetry::{init_logging, LogConfig, LogFormat};
use coherence_core::{BufferDescriptor, QueueRef, SimQueue, SyncMode};
use std::sync::Arc;

#[test]
fn pretty_format_writes_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pretty.log");
    let config = LogConfig {
        format: LogFormat::Pretty,
        level: "coherence_core=debug".to_string(),
        output_path: Some(path.clone()),
    };
    init_logging(&config).unwrap();

    let a: QueueRef = Arc::new(SimQueue::accelerator(0, 1024));
    let b: QueueRef = Arc::new(SimQueue::accelerator(1, 1024));
    let desc = BufferDescriptor::new(a, &[7; 16], true).unwrap();
    desc.sync(&b, SyncMode::read()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("transfer"));
    assert!(contents.contains("sim:1"));
    assert!(!contents.contains('\u{1b}'), "file output must not carry ANSI escapes");
}
