// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Span utilities for kernel launches.

use tracing::{info_span, Span};

/// Extension trait for recording an outcome into a span.
pub trait SpanExt {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for launch spans.
pub struct LaunchSpan;

impl LaunchSpan {
    /// Span for one walk over a kernel's captured arguments.
    ///
    /// `status` and `error.message` are filled in by `SpanExt::record_result`.
    pub fn new(walker: &'static str, device: &str, args: usize) -> Span {
        info_span!(
            "kernel_launch",
            walker,
            device = %device,
            args,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
