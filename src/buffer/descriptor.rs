// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Buffer descriptor: per-container residency state.
//!
//! One descriptor is shared by every queue and kernel that touches a
//! container. The residency table and stage live behind a per-descriptor
//! mutex so concurrent launches on different host threads serialize on
//! the descriptor rather than racing on its table.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::device::{DeviceError, DevicePath, DevicePtr, QueueRef};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of one device's copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Residency {
    pub device: DevicePath,
    pub ptr: DevicePtr,
    pub valid: bool,
}

pub(crate) struct ResidencyEntry {
    pub(crate) queue: QueueRef,
    pub(crate) ptr: DevicePtr,
    pub(crate) valid: bool,
}

pub(crate) struct DescriptorState {
    pub(crate) stage: QueueRef,
    pub(crate) residency: HashMap<DevicePath, ResidencyEntry>,
    pub(crate) host_data: DevicePtr,
    /// Device whose entry currently holds the logical pointer while the
    /// real allocation sits in `host_data`.
    pub(crate) swapped_on: Option<DevicePath>,
}

impl DescriptorState {
    /// Allocation backing the copy on `device`, accounting for an active swap.
    pub(crate) fn resident_ptr(&self, device: &DevicePath) -> Option<DevicePtr> {
        let entry = self.residency.get(device)?;
        if self.swapped_on.as_ref() == Some(device) {
            Some(self.host_data)
        } else {
            Some(entry.ptr)
        }
    }
}

/// Residency record for one logical container.
pub struct BufferDescriptor {
    pub(crate) id: BufferId,
    pub(crate) size: usize,
    pub(crate) is_array: bool,
    pub(crate) master: QueueRef,
    pub(crate) state: Mutex<DescriptorState>,
    pub(crate) transfers: AtomicU64,
}

impl BufferDescriptor {
    /// Create a descriptor whose initial copy lives on `master`.
    pub fn new(
        master: QueueRef,
        contents: &[u8],
        is_array: bool,
    ) -> Result<Arc<Self>, DeviceError> {
        Self::place(master.clone(), master, contents, is_array)
    }

    /// Create a host-mastered staging array whose initial copy lives on
    /// the `associated` accelerator.
    pub fn staging(
        master: QueueRef,
        associated: QueueRef,
        contents: &[u8],
    ) -> Result<Arc<Self>, DeviceError> {
        Self::place(master, associated, contents, true)
    }

    fn place(
        master: QueueRef,
        stage: QueueRef,
        contents: &[u8],
        is_array: bool,
    ) -> Result<Arc<Self>, DeviceError> {
        let ptr = stage.allocate(contents.len())?;
        if let Err(e) = stage.write(ptr, contents) {
            let _ = stage.deallocate(ptr);
            return Err(e);
        }

        let mut residency = HashMap::new();
        residency.insert(
            stage.device_path(),
            ResidencyEntry { queue: stage.clone(), ptr, valid: true },
        );

        let id = BufferId::next();
        tracing::trace!(
            buffer = %id,
            master = %master.device_path(),
            stage = %stage.device_path(),
            size = contents.len(),
            "descriptor created"
        );

        Ok(Arc::new(Self {
            id,
            size: contents.len(),
            is_array,
            master,
            state: Mutex::new(DescriptorState {
                stage,
                residency,
                host_data: DevicePtr::NULL,
                swapped_on: None,
            }),
            transfers: AtomicU64::new(0),
        }))
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Size of the container in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn master(&self) -> &QueueRef {
        &self.master
    }

    pub fn master_path(&self) -> DevicePath {
        self.master.device_path()
    }

    /// Queue of the device holding the freshest copy.
    pub fn stage_queue(&self) -> QueueRef {
        self.state.lock().stage.clone()
    }

    pub fn stage_path(&self) -> DevicePath {
        self.state.lock().stage.device_path()
    }

    /// Logical pointer used by host-side code paths.
    pub fn host_data(&self) -> DevicePtr {
        self.state.lock().host_data
    }

    pub fn set_host_data(&self, ptr: DevicePtr) {
        self.state.lock().host_data = ptr;
    }

    pub fn is_valid_on(&self, device: &DevicePath) -> bool {
        self.state.lock().residency.get(device).map_or(false, |e| e.valid)
    }

    /// Resident pointer on `device`, valid or stale.
    pub fn device_ptr(&self, device: &DevicePath) -> Option<DevicePtr> {
        self.state.lock().residency.get(device).map(|e| e.ptr)
    }

    /// Every device copy, sorted by device path.
    pub fn residency(&self) -> Vec<Residency> {
        let state = self.state.lock();
        let mut out: Vec<Residency> = state
            .residency
            .iter()
            .map(|(device, e)| Residency { device: *device, ptr: e.ptr, valid: e.valid })
            .collect();
        out.sort_by_key(|r| r.device);
        out
    }

    /// Number of copies performed by the synchronization protocol.
    pub fn transfer_count(&self) -> u64 {
        self.transfers.load(Ordering::Relaxed)
    }

    /// Whether `host_data` currently aliases a resident copy.
    pub fn is_swapped(&self) -> bool {
        self.state.lock().swapped_on.is_some()
    }

    /// Exchange `host_data` with the resident pointer on `device`.
    ///
    /// Calling it twice for the same device restores both pointers.
    pub(crate) fn swap_host_data(&self, device: &DevicePath) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        let state = &mut *state;
        let entry = state
            .residency
            .get_mut(device)
            .ok_or(DeviceError::InvalidPointer { device: *device, ptr: DevicePtr::NULL })?;
        std::mem::swap(&mut entry.ptr, &mut state.host_data);
        state.swapped_on = match state.swapped_on {
            Some(active) if active == *device => None,
            _ => Some(*device),
        };
        Ok(())
    }
}

impl fmt::Debug for BufferDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferDescriptor")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("is_array", &self.is_array)
            .field("master", &self.master.device_path())
            .field("stage", &self.stage_path())
            .finish()
    }
}

impl Drop for BufferDescriptor {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        let swapped_on = state.swapped_on.take();
        let host_data = state.host_data;
        for (device, entry) in state.residency.drain() {
            let ptr = if swapped_on == Some(device) { host_data } else { entry.ptr };
            if let Err(e) = entry.queue.deallocate(ptr) {
                tracing::warn!(
                    buffer = %self.id,
                    device = %device,
                    error = %e,
                    "failed to release device copy"
                );
            }
        }
    }
}
