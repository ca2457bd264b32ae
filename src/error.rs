// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Error types for buffer synchronization and argument marshaling.
//!
//! Policy violations are programming errors: they abort the walk and are
//! never retried.

use thiserror::Error;

use crate::buffer::BufferId;
use crate::device::{DeviceError, DevicePath};
use crate::kernel::KernelError;

/// Result alias for walk and sync operations.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Errors that abort a kernel-launch walk.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error(
        "Unsupported accelerator: buffer {buffer} mastered on {master} (stage {stage}) cannot be synchronized to {target}"
    )]
    UnsupportedAccelerator {
        buffer: BufferId,
        master: DevicePath,
        stage: DevicePath,
        target: DevicePath,
    },

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
}

impl MarshalError {
    /// Returns true if this error is an access-policy violation.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::UnsupportedAccelerator { .. })
    }
}
