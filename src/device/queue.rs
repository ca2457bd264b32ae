// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Device queue contract.
//!
//! A queue is the only thing in this crate that touches device memory.
//! Copies are synchronous: when `write` or `copy_from` returns, the bytes
//! are resident on the destination device.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::path::{DevicePath, DevicePtr};
use crate::kernel::KernelHandle;

/// Device-level failures reported by a queue implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Out of device memory: required {required} bytes, available {available} bytes")]
    OutOfMemory { required: usize, available: usize },

    #[error("Invalid pointer {ptr} on device {device}")]
    InvalidPointer { device: DevicePath, ptr: DevicePtr },

    #[error("Size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Copy failed: {0}")]
    CopyFailed(String),
}

/// Native operations of one device queue.
pub trait DeviceQueue: Send + Sync + fmt::Debug {
    /// Identity of the device this queue submits to.
    fn device_path(&self) -> DevicePath;

    fn allocate(&self, size: usize) -> Result<DevicePtr, DeviceError>;

    fn deallocate(&self, ptr: DevicePtr) -> Result<(), DeviceError>;

    /// Copy device memory at `ptr` into `dst`. Blocks until complete.
    fn read(&self, ptr: DevicePtr, dst: &mut [u8]) -> Result<(), DeviceError>;

    /// Copy `src` into device memory at `ptr`. Blocks until complete.
    fn write(&self, ptr: DevicePtr, src: &[u8]) -> Result<(), DeviceError>;

    /// Copy `size` bytes resident on `src` into `dst_ptr` on this device.
    ///
    /// The default stages through a host buffer. Backends with a direct
    /// peer path override this.
    fn copy_from(
        &self,
        src: &dyn DeviceQueue,
        src_ptr: DevicePtr,
        dst_ptr: DevicePtr,
        size: usize,
    ) -> Result<(), DeviceError> {
        let mut staging = vec![0u8; size];
        src.read(src_ptr, &mut staging)?;
        self.write(dst_ptr, &staging)
    }

    /// Bind a device-resident buffer as positional argument `slot`.
    fn push_argument(
        &self,
        kernel: &mut dyn KernelHandle,
        slot: usize,
        ptr: DevicePtr,
        will_modify: bool,
    ) {
        kernel.push_buffer(slot, ptr, will_modify);
    }
}

/// Shared handle to a queue.
pub type QueueRef = Arc<dyn DeviceQueue>;

/// Two queues address the same device iff their paths match.
pub fn queue_eq(a: &dyn DeviceQueue, b: &dyn DeviceQueue) -> bool {
    a.device_path() == b.device_path()
}
