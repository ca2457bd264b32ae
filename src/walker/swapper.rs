// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Residency swapper for host execution.
//!
//! Exchanges each container's logical `host_data` pointer with its host
//! copy so a kernel body running on the host reads synchronized memory.
//! One walk swaps in one direction only; the caller brackets execution
//! with a swap-in walk and an independent swap-out walk.

use std::collections::HashSet;
use std::sync::Arc;

use super::BufferWalker;
use crate::buffer::{BufferDescriptor, BufferId, SyncMode};
use crate::device::QueueRef;
use crate::error::Result;

pub struct ResidencySwapper {
    host: QueueRef,
    swapped: HashSet<BufferId>,
    order: Vec<Arc<BufferDescriptor>>,
}

impl ResidencySwapper {
    pub fn new(host: QueueRef) -> Self {
        Self { host, swapped: HashSet::new(), order: Vec::new() }
    }

    /// Number of distinct descriptors swapped by this walk.
    pub fn swapped_count(&self) -> usize {
        self.swapped.len()
    }

    pub fn has_swapped(&self, id: BufferId) -> bool {
        self.swapped.contains(&id)
    }

    /// Undo every swap made by this walk, most recent first.
    pub fn rollback(&mut self) -> Result<()> {
        let device = self.host.device_path();
        while let Some(descriptor) = self.order.pop() {
            descriptor.swap_host_data(&device)?;
            self.swapped.remove(&descriptor.id());
        }
        Ok(())
    }
}

impl BufferWalker for ResidencySwapper {
    fn push(
        &mut self,
        descriptor: &Arc<BufferDescriptor>,
        will_modify: bool,
        is_array: bool,
    ) -> Result<()> {
        let mode = SyncMode::new(will_modify, false);
        descriptor.sync_with_policy(&self.host, mode, is_array || descriptor.is_array())?;

        if self.swapped.contains(&descriptor.id()) {
            tracing::trace!(buffer = %descriptor.id(), "already swapped this walk");
            return Ok(());
        }
        descriptor.swap_host_data(&self.host.device_path())?;
        self.swapped.insert(descriptor.id());
        self.order.push(descriptor.clone());
        Ok(())
    }
}
