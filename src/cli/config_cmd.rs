// Copyright 2024-2026 Coherence-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read configuration directly from environment variables.

use tracing_subscriber::EnvFilter;

use crate::config::{self, EffectiveConfig, EnvConfig, DEFAULT_HOST_CAPACITY};

/// Print effective config to stdout, as `KEY=value` lines or JSON.
pub fn run_show(json: bool) -> i32 {
    let cfg = config::load().effective_config();
    if json {
        match serde_json::to_string_pretty(&cfg) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("ERROR: failed to serialize config: {}", e);
                return 1;
            }
        }
    } else {
        print!("{}", render_show(&cfg));
    }
    0
}

/// Print default config values (no env overrides) to stdout.
pub fn run_defaults() {
    print!("{}", render_defaults());
}

/// Validate configuration; returns 0 if valid, 1 if any warnings are found.
pub fn run_validate() -> i32 {
    let warnings = validate(&config::load());
    for w in &warnings {
        eprintln!("WARNING: {}", w);
    }
    if warnings.is_empty() {
        println!("Configuration is valid.");
        0
    } else {
        1
    }
}

/// Collect misconfiguration warnings.
pub fn validate(env: &EnvConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Err(e) = EnvFilter::try_new(&env.log.level) {
        warnings.push(format!(
            "COHERENCE_LOG_LEVEL ({}) is not a valid filter: {}",
            env.log.level, e
        ));
    }

    if let Some(path) = &env.log.output_path {
        let parent_missing = path
            .parent()
            .map_or(false, |p| !p.as_os_str().is_empty() && !p.exists());
        if parent_missing {
            warnings.push(format!(
                "COHERENCE_LOG_FILE ({}) is in a directory that does not exist",
                path.display()
            ));
        }
    }

    warnings
}

pub fn render_show(cfg: &EffectiveConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("COHERENCE_FALLBACK_TARGET={}\n", cfg.fallback_target));
    out.push_str(&format!("COHERENCE_LOG_LEVEL={}\n", cfg.log_level));
    out.push_str(&format!("COHERENCE_LOG_FORMAT={}\n", cfg.log_format));
    out.push_str(&format!("COHERENCE_LOG_FILE={}\n", cfg.log_file.as_deref().unwrap_or("")));
    out.push_str(&format!("COHERENCE_HOST_CAPACITY={}\n", cfg.host_capacity));
    out
}

pub fn render_defaults() -> String {
    let mut out = String::new();
    out.push_str("COHERENCE_FALLBACK_TARGET=host\n");
    out.push_str("COHERENCE_LOG_LEVEL=info\n");
    out.push_str("COHERENCE_LOG_FORMAT=json\n");
    out.push_str("COHERENCE_LOG_FILE=\n");
    out.push_str(&format!("COHERENCE_HOST_CAPACITY={}\n", DEFAULT_HOST_CAPACITY));
    out
}
