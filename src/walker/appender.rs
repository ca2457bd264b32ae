// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Argument appender: builds a target queue's native argument list.

use std::sync::Arc;

use super::BufferWalker;
use crate::buffer::{BufferDescriptor, SyncMode};
use crate::device::{DeviceError, DevicePtr, QueueRef};
use crate::error::Result;
use crate::kernel::KernelHandle;

/// Assigns slots `0, 1, 2, ...` in visitation order.
pub struct ArgumentAppender<'k> {
    queue: QueueRef,
    kernel: &'k mut dyn KernelHandle,
    next_slot: usize,
}

impl<'k> ArgumentAppender<'k> {
    pub fn new(queue: QueueRef, kernel: &'k mut dyn KernelHandle) -> Self {
        Self { queue, kernel, next_slot: 0 }
    }

    /// Slot the next argument will occupy.
    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    pub fn queue(&self) -> &QueueRef {
        &self.queue
    }

    fn take_slot(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }
}

impl BufferWalker for ArgumentAppender<'_> {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let slot = self.take_slot();
        self.kernel.push_value(slot, bytes);
        Ok(())
    }

    fn append_ptr(&mut self, size: usize, ptr: DevicePtr) -> Result<()> {
        let slot = self.take_slot();
        self.kernel.push_pointer(slot, size, ptr);
        Ok(())
    }

    fn push(
        &mut self,
        descriptor: &Arc<BufferDescriptor>,
        will_modify: bool,
        is_array: bool,
    ) -> Result<()> {
        let mode = SyncMode::new(will_modify, false);
        descriptor.sync_with_policy(&self.queue, mode, is_array || descriptor.is_array())?;

        let device = self.queue.device_path();
        let ptr = descriptor
            .device_ptr(&device)
            .ok_or(DeviceError::InvalidPointer { device, ptr: DevicePtr::NULL })?;

        let slot = self.take_slot();
        self.queue.push_argument(&mut *self.kernel, slot, ptr, will_modify);
        Ok(())
    }
}
