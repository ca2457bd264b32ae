// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Device identities, the queue contract, and an in-memory queue.

mod path;
mod queue;
mod sim;

pub use path::{AcceleratorKind, DevicePath, DevicePtr};
pub use queue::{queue_eq, DeviceError, DeviceQueue, QueueRef};
pub use sim::SimQueue;
