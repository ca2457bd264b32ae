// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Native kernel argument lists.
//!
//! A backend's launch mechanism receives arguments positionally. The
//! `KernelHandle` trait is the seam a backend implements; `ArgumentList`
//! is the recording implementation used by the simulated backend.

use thiserror::Error;

use crate::device::DevicePtr;

/// Errors raised while building an argument list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Argument slot out of order: expected slot {expected}, got {got}")]
    SlotOutOfOrder { expected: usize, got: usize },
}

/// Positional argument sink of a compiled kernel.
pub trait KernelHandle {
    /// Copy `bytes` by value into `slot`.
    fn push_value(&mut self, slot: usize, bytes: &[u8]);

    /// Bind a raw device pointer into `slot` without synchronization.
    fn push_pointer(&mut self, slot: usize, size: usize, ptr: DevicePtr);

    /// Bind a synchronized device buffer into `slot`.
    fn push_buffer(&mut self, slot: usize, ptr: DevicePtr, will_modify: bool);
}

/// One recorded kernel argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelArg {
    Value(Vec<u8>),
    Pointer { size: usize, ptr: DevicePtr },
    Buffer { ptr: DevicePtr, writable: bool },
}

/// Recording argument list.
///
/// Slots must arrive as `0, 1, 2, ...`. The first out-of-order push is
/// retained and reported by [`ArgumentList::finish`]; later pushes are
/// dropped.
#[derive(Debug, Default)]
pub struct ArgumentList {
    args: Vec<KernelArg>,
    error: Option<KernelError>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args(&self) -> &[KernelArg] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Ordering error recorded so far, if any.
    pub fn error(&self) -> Option<&KernelError> {
        self.error.as_ref()
    }

    /// Drop every recorded argument and any pending error.
    pub fn clear(&mut self) {
        self.args.clear();
        self.error = None;
    }

    /// Consume the list, surfacing an ordering error if one occurred.
    pub fn finish(self) -> Result<Vec<KernelArg>, KernelError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.args),
        }
    }

    fn record(&mut self, slot: usize, arg: KernelArg) {
        if self.error.is_some() {
            return;
        }
        if slot != self.args.len() {
            self.error = Some(KernelError::SlotOutOfOrder { expected: self.args.len(), got: slot });
            return;
        }
        self.args.push(arg);
    }
}

impl KernelHandle for ArgumentList {
    fn push_value(&mut self, slot: usize, bytes: &[u8]) {
        self.record(slot, KernelArg::Value(bytes.to_vec()));
    }

    fn push_pointer(&mut self, slot: usize, size: usize, ptr: DevicePtr) {
        self.record(slot, KernelArg::Pointer { size, ptr });
    }

    fn push_buffer(&mut self, slot: usize, ptr: DevicePtr, will_modify: bool) {
        self.record(slot, KernelArg::Buffer { ptr, writable: will_modify });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_recorded_in_order() {
        let mut list = ArgumentList::new();
        list.push_value(0, &[1, 2]);
        list.push_pointer(1, 16, DevicePtr(0x40));
        list.push_buffer(2, DevicePtr(7), true);

        let args = list.finish().unwrap();
        assert_eq!(
            args,
            vec![
                KernelArg::Value(vec![1, 2]),
                KernelArg::Pointer { size: 16, ptr: DevicePtr(0x40) },
                KernelArg::Buffer { ptr: DevicePtr(7), writable: true },
            ]
        );
    }

    #[test]
    fn test_out_of_order_slot_is_reported() {
        let mut list = ArgumentList::new();
        list.push_value(0, &[1]);
        list.push_value(2, &[2]);
        list.push_value(1, &[3]);

        assert_eq!(list.len(), 1);
        assert_eq!(list.error(), Some(&KernelError::SlotOutOfOrder { expected: 1, got: 2 }));
        assert_eq!(list.finish(), Err(KernelError::SlotOutOfOrder { expected: 1, got: 2 }));
    }

    #[test]
    fn test_clear_resets_error() {
        let mut list = ArgumentList::new();
        list.push_value(5, &[1]);
        list.clear();
        list.push_value(0, &[1]);
        assert!(!list.is_empty());
        assert!(list.finish().is_ok());
    }
}
