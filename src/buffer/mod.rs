// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Buffer descriptors and the synchronization protocol.

mod descriptor;
mod sync;

pub use descriptor::{BufferDescriptor, BufferId, Residency};
pub use sync::SyncMode;

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
