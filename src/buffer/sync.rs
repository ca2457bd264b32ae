// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Synchronization protocol.
//!
//! Single-writer, multi-reader coherence over a descriptor's residency
//! table. Reads add valid copies; a write-granting sync leaves exactly one.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::descriptor::{BufferDescriptor, DescriptorState, ResidencyEntry};
use crate::device::{DeviceError, DevicePath, QueueRef};
use crate::error::{MarshalError, Result};
use crate::telemetry::metrics;

/// Intent of a synchronization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMode {
    /// The caller intends to write through the target copy.
    pub will_modify: bool,
    /// Read-only call site; suppresses invalidation even if `will_modify`.
    pub source_only: bool,
}

impl SyncMode {
    pub fn read() -> Self {
        Self { will_modify: false, source_only: false }
    }

    pub fn write() -> Self {
        Self { will_modify: true, source_only: false }
    }

    pub fn source() -> Self {
        Self { will_modify: false, source_only: true }
    }

    pub fn new(will_modify: bool, source_only: bool) -> Self {
        Self { will_modify, source_only }
    }

    /// True when this sync transfers ownership of the freshest copy.
    pub fn grants_write(&self) -> bool {
        self.will_modify && !self.source_only
    }
}

impl BufferDescriptor {
    /// Make `target`'s copy valid.
    ///
    /// Array descriptors are subject to the access policy. A target that
    /// already holds a valid copy performs no transfer.
    pub fn sync(&self, target: &QueueRef, mode: SyncMode) -> Result<()> {
        self.sync_with_policy(target, mode, self.is_array)
    }

    /// Sync a read copy onto `queue` and return its bytes.
    ///
    /// Host-side access; the kernel-argument access policy does not apply.
    pub fn read_to_vec(&self, queue: &QueueRef) -> Result<Vec<u8>> {
        self.sync_with_policy(queue, SyncMode::source(), false)?;
        let path = queue.device_path();
        let ptr = self
            .state
            .lock()
            .resident_ptr(&path)
            .ok_or(DeviceError::InvalidPointer { device: path, ptr: Default::default() })?;
        let mut out = vec![0u8; self.size];
        queue.read(ptr, &mut out)?;
        Ok(out)
    }

    pub(crate) fn sync_with_policy(
        &self,
        target: &QueueRef,
        mode: SyncMode,
        enforce_policy: bool,
    ) -> Result<()> {
        let target_path = target.device_path();
        let mut state = self.state.lock();

        if enforce_policy {
            self.check_access(&state, target_path)?;
        }

        let valid = state.residency.get(&target_path).map_or(false, |e| e.valid);
        if !valid {
            self.transfer(&mut state, target, target_path)?;
        }

        if mode.grants_write() {
            let mut invalidated = 0u64;
            for (path, entry) in state.residency.iter_mut() {
                if *path != target_path && entry.valid {
                    entry.valid = false;
                    invalidated += 1;
                }
            }
            state.stage = Arc::clone(target);
            if invalidated > 0 {
                metrics::record_invalidations(invalidated);
                tracing::debug!(
                    buffer = %self.id,
                    stage = %target_path,
                    invalidated,
                    "write granted"
                );
            }
        }

        Ok(())
    }

    /// Host-mastered arrays may only be used where their stage lives, and
    /// never when that stage is the host itself.
    fn check_access(&self, state: &DescriptorState, target: DevicePath) -> Result<()> {
        let master = self.master.device_path();
        if !master.is_host() {
            return Ok(());
        }

        let stage = state.stage.device_path();
        if stage.is_host() || stage != target {
            metrics::record_policy_violation();
            tracing::warn!(
                buffer = %self.id,
                master = %master,
                stage = %stage,
                target = %target,
                "access policy violation"
            );
            return Err(MarshalError::UnsupportedAccelerator {
                buffer: self.id,
                master,
                stage,
                target,
            });
        }
        Ok(())
    }

    fn transfer(
        &self,
        state: &mut DescriptorState,
        target: &QueueRef,
        target_path: DevicePath,
    ) -> Result<()> {
        let stage_path = state.stage.device_path();
        let src_ptr = state.resident_ptr(&stage_path);
        let (src_queue, src_ptr) = match (state.residency.get(&stage_path), src_ptr) {
            (Some(e), Some(ptr)) if e.valid => (e.queue.clone(), ptr),
            _ => {
                return Err(DeviceError::CopyFailed(format!(
                    "buffer {} has no valid copy on stage {}",
                    self.id, stage_path
                ))
                .into())
            }
        };

        let dst_ptr = match state.resident_ptr(&target_path) {
            Some(ptr) => ptr,
            None => {
                let ptr = target.allocate(self.size)?;
                state.residency.insert(
                    target_path,
                    ResidencyEntry { queue: target.clone(), ptr, valid: false },
                );
                ptr
            }
        };

        target.copy_from(src_queue.as_ref(), src_ptr, dst_ptr, self.size)?;

        if let Some(entry) = state.residency.get_mut(&target_path) {
            entry.valid = true;
        }
        self.transfers.fetch_add(1, Ordering::Relaxed);
        metrics::record_transfer(self.size);
        tracing::debug!(
            buffer = %self.id,
            from = %stage_path,
            to = %target_path,
            bytes = self.size,
            "transfer"
        );
        Ok(())
    }
}
