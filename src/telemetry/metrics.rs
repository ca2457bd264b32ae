// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Transfer and policy counters via the `metrics` facade.
//!
//! Recording is a no-op until the host process installs a recorder.

use metrics::{counter, describe_counter};

pub const TRANSFERS_TOTAL: &str = "coherence_transfers_total";
pub const TRANSFER_BYTES_TOTAL: &str = "coherence_transfer_bytes_total";
pub const INVALIDATIONS_TOTAL: &str = "coherence_invalidations_total";
pub const POLICY_VIOLATIONS_TOTAL: &str = "coherence_policy_violations_total";

/// Register counter descriptions with the installed recorder.
pub fn init_metrics() {
    describe_counter!(TRANSFERS_TOTAL, "Buffer copies performed by synchronization");
    describe_counter!(TRANSFER_BYTES_TOTAL, "Bytes copied by synchronization");
    describe_counter!(INVALIDATIONS_TOTAL, "Device copies invalidated by writes");
    describe_counter!(POLICY_VIOLATIONS_TOTAL, "Access-policy violations");
}

pub fn record_transfer(bytes: usize) {
    counter!(TRANSFERS_TOTAL).increment(1);
    counter!(TRANSFER_BYTES_TOTAL).increment(bytes as u64);
}

pub fn record_invalidations(count: u64) {
    counter!(INVALIDATIONS_TOTAL).increment(count);
}

pub fn record_policy_violation() {
    counter!(POLICY_VIOLATIONS_TOTAL).increment(1);
}
