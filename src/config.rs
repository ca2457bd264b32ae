// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Runtime configuration loading from environment variables.
//!
//! All values come from `COHERENCE_*` environment variables with sensible
//! defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `COHERENCE_FALLBACK_TARGET` | host | Launch target when no array is staged on an accelerator (`host`, `sole-accelerator`) |
//! | `COHERENCE_LOG_LEVEL` | info | Tracing filter directive |
//! | `COHERENCE_LOG_FORMAT` | json | Log format (`json`, `pretty`) |
//! | `COHERENCE_LOG_FILE` | (unset) | Log file path; stderr when unset |
//! | `COHERENCE_HOST_CAPACITY` | 1073741824 | Byte capacity of the default host queue |

use std::path::PathBuf;

use serde::Serialize;

use crate::launch::{FallbackTarget, LaunchConfig};
use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_HOST_CAPACITY: usize = 1024 * 1024 * 1024;
const MIN_HOST_CAPACITY: usize = 4096;

/// Effective configuration summary.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub fallback_target: String,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<String>,
    pub host_capacity: usize,
}

/// All configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub fallback: FallbackTarget,
    pub log: LogConfig,
    pub host_capacity: usize,
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

fn load_fallback() -> FallbackTarget {
    std::env::var("COHERENCE_FALLBACK_TARGET")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

fn load_log_config() -> LogConfig {
    let level = std::env::var("COHERENCE_LOG_LEVEL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string());
    let format = std::env::var("COHERENCE_LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    let output_path = std::env::var("COHERENCE_LOG_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    LogConfig { format, level, output_path }
}

/// Load all configuration from environment variables.
pub fn load() -> EnvConfig {
    let host_capacity = parse_usize("COHERENCE_HOST_CAPACITY", DEFAULT_HOST_CAPACITY);
    let host_capacity = host_capacity.max(MIN_HOST_CAPACITY);

    EnvConfig {
        fallback: load_fallback(),
        log: load_log_config(),
        host_capacity,
    }
}

impl EnvConfig {
    /// Launcher settings derived from this configuration.
    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig { fallback: self.fallback }
    }

    pub fn effective_config(&self) -> EffectiveConfig {
        EffectiveConfig {
            fallback_target: self.fallback.as_str().to_string(),
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str().to_string(),
            log_file: self.log.output_path.as_ref().map(|p| p.display().to_string()),
            host_capacity: self.host_capacity,
        }
    }
}
