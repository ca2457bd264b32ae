// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Device identity.
//!
//! Device paths are compared structurally rather than as strings. The
//! derived ordering puts the host first and then sorts accelerators by
//! backend and index, which gives the queue selector a total order to
//! cluster candidates with.

use std::fmt;

/// Accelerator backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AcceleratorKind {
    /// NVIDIA CUDA device
    Cuda,
    /// Apple Metal device
    Metal,
    /// In-memory simulated device
    Simulated,
}

impl fmt::Display for AcceleratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceleratorKind::Cuda => write!(f, "cuda"),
            AcceleratorKind::Metal => write!(f, "metal"),
            AcceleratorKind::Simulated => write!(f, "sim"),
        }
    }
}

/// Comparable identity of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DevicePath {
    /// The host CPU.
    Host,
    /// An accelerator, identified by backend and ordinal.
    Accelerator { kind: AcceleratorKind, index: u32 },
}

impl DevicePath {
    pub fn accelerator(kind: AcceleratorKind, index: u32) -> Self {
        Self::Accelerator { kind, index }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, DevicePath::Host)
    }
}

impl Default for DevicePath {
    fn default() -> Self {
        Self::Host
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePath::Host => write!(f, "cpu"),
            DevicePath::Accelerator { kind, index } => write!(f, "{}:{}", kind, index),
        }
    }
}

/// Opaque address of a device-resident allocation.
///
/// Never dereferenced by this crate; only the owning queue interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DevicePtr(pub u64);

impl DevicePtr {
    pub const NULL: DevicePtr = DevicePtr(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DevicePtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
