// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! In-memory device queue.
//!
//! Backs the host queue and stands in for accelerators in tests. Every
//! allocation is a zeroed `Vec<u8>` keyed by a unique id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::path::{AcceleratorKind, DevicePath, DevicePtr};
use super::queue::{DeviceError, DeviceQueue};

struct SimState {
    allocations: HashMap<u64, Vec<u8>>,
    total: usize,
}

/// Queue over host memory with a fixed byte capacity.
pub struct SimQueue {
    path: DevicePath,
    capacity: usize,
    next_id: AtomicU64,
    writes: AtomicU64,
    reads: AtomicU64,
    state: Mutex<SimState>,
}

impl SimQueue {
    pub fn new(path: DevicePath, capacity: usize) -> Self {
        Self {
            path,
            capacity,
            next_id: AtomicU64::new(1),
            writes: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            state: Mutex::new(SimState { allocations: HashMap::new(), total: 0 }),
        }
    }

    /// Host queue with the given capacity.
    pub fn host(capacity: usize) -> Self {
        Self::new(DevicePath::Host, capacity)
    }

    /// Simulated accelerator `sim:<index>`.
    pub fn accelerator(index: u32, capacity: usize) -> Self {
        Self::new(DevicePath::accelerator(AcceleratorKind::Simulated, index), capacity)
    }

    /// Count of live (un-freed) allocations.
    pub fn leak_count(&self) -> usize {
        self.state.lock().allocations.len()
    }

    pub fn allocated_bytes(&self) -> usize {
        self.state.lock().total
    }

    /// Number of completed writes into this device.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of completed reads out of this device.
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    fn invalid(&self, ptr: DevicePtr) -> DeviceError {
        DeviceError::InvalidPointer { device: self.path, ptr }
    }
}

impl std::fmt::Debug for SimQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimQueue")
            .field("path", &self.path)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl DeviceQueue for SimQueue {
    fn device_path(&self) -> DevicePath {
        self.path
    }

    fn allocate(&self, size: usize) -> Result<DevicePtr, DeviceError> {
        let mut s = self.state.lock();
        if s.total.checked_add(size).map_or(true, |t| t > self.capacity) {
            return Err(DeviceError::OutOfMemory {
                required: size,
                available: self.capacity - s.total,
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        s.allocations.insert(id, vec![0u8; size]);
        s.total += size;
        Ok(DevicePtr(id))
    }

    fn deallocate(&self, ptr: DevicePtr) -> Result<(), DeviceError> {
        let mut s = self.state.lock();
        match s.allocations.remove(&ptr.0) {
            Some(buf) => {
                s.total -= buf.len();
                Ok(())
            }
            None => Err(self.invalid(ptr)),
        }
    }

    fn read(&self, ptr: DevicePtr, dst: &mut [u8]) -> Result<(), DeviceError> {
        let s = self.state.lock();
        let buf = s.allocations.get(&ptr.0).ok_or_else(|| self.invalid(ptr))?;
        if buf.len() != dst.len() {
            return Err(DeviceError::SizeMismatch { expected: buf.len(), actual: dst.len() });
        }
        dst.copy_from_slice(buf);
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write(&self, ptr: DevicePtr, src: &[u8]) -> Result<(), DeviceError> {
        let mut s = self.state.lock();
        let buf = s.allocations.get_mut(&ptr.0).ok_or_else(|| self.invalid(ptr))?;
        if buf.len() != src.len() {
            return Err(DeviceError::SizeMismatch { expected: buf.len(), actual: src.len() });
        }
        buf.copy_from_slice(src);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
