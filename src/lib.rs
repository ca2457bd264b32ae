// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Coherence Core
//!
//! Buffer synchronization and kernel-argument marshaling for a host plus
//! accelerator compute runtime. At every kernel launch the captured
//! containers are made coherent with the executing device, converted into
//! that device's positional argument list, and, without an explicit target,
//! used to pick the device that minimizes data movement.
//!
//! # Layers
//!
//! - **Buffer descriptors**: per-container residency table, master and stage device
//! - **Synchronization**: single-writer, multi-reader coherence plus the access policy
//! - **Walkers**: argument appender, residency swapper, queue selector
//! - **Launch**: walk driver, queue selection fallback, host-execution bracket
//!
//! Device enumeration, kernel compilation and the container types that own
//! descriptors live outside this crate.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod kernel;
pub mod launch;
pub mod telemetry;
pub mod walker;

pub use buffer::{BufferDescriptor, BufferId, Residency, SyncMode};
pub use device::{
    AcceleratorKind, DeviceError, DevicePath, DevicePtr, DeviceQueue, QueueRef, SimQueue,
};
pub use error::{MarshalError, Result};
pub use kernel::{ArgumentList, KernelArg, KernelError, KernelHandle};
pub use launch::{walk, CapturedArg, FallbackTarget, LaunchConfig, Launcher};
pub use walker::{ArgumentAppender, BufferWalker, QueueSelector, ResidencySwapper, Walker};
