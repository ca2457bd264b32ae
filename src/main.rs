// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Coherence Core CLI entry point.
//!
//! ## CLI Subcommands
//!
//! - `coherence-cli config show [--json]` - Print effective configuration
//! - `coherence-cli config defaults` - Print documented defaults
//! - `coherence-cli config validate` - Check configuration (exit 0/1)

use std::process::ExitCode;

use coherence_core::{cli, config, telemetry};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let sub = args.get(2).map(|s| s.as_str()).unwrap_or("show");

    let env = config::load();
    if let Err(e) = telemetry::init_logging(&env.log) {
        eprintln!("Logging disabled: {}", e);
    }
    telemetry::metrics::init_metrics();

    match (command, sub) {
        ("config", "show") => {
            let json = args.iter().skip(3).any(|a| a == "--json");
            ExitCode::from(cli::run_show(json) as u8)
        }
        ("config", "defaults") => {
            cli::run_defaults();
            ExitCode::SUCCESS
        }
        ("config", "validate") => ExitCode::from(cli::run_validate() as u8),
        _ => {
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: coherence-cli config <show [--json]|defaults|validate>");
}
