// Copyright 2024-2026 Coherence-Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommands.

mod config_cmd;

pub use config_cmd::{render_defaults, render_show, run_defaults, run_show, run_validate, validate};
