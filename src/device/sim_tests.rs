//! Tests for the in-memory device queue.

use super::*;
use crate::device::queue_eq;

#[test]
fn allocate_and_deallocate_all_returns_zero() {
    let queue = SimQueue::host(4096);
    let mut ptrs = Vec::new();
    for _ in 0..8 {
        ptrs.push(queue.allocate(512).unwrap());
    }
    assert_eq!(queue.allocated_bytes(), 4096);
    for p in &ptrs {
        queue.deallocate(*p).unwrap();
    }
    assert_eq!(queue.allocated_bytes(), 0);
    assert_eq!(queue.leak_count(), 0);
}

#[test]
fn beyond_capacity_returns_out_of_memory() {
    let queue = SimQueue::accelerator(0, 1024);
    let _a = queue.allocate(512).unwrap();
    let result = queue.allocate(1024);
    assert_eq!(result, Err(DeviceError::OutOfMemory { required: 1024, available: 512 }));
}

#[test]
fn huge_request_is_out_of_memory_not_overflow() {
    let queue = SimQueue::host(4096);
    let _held = queue.allocate(1024).unwrap();

    let result = queue.allocate(usize::MAX);

    assert_eq!(result, Err(DeviceError::OutOfMemory { required: usize::MAX, available: 3072 }));
    assert_eq!(queue.leak_count(), 1);
}

#[test]
fn double_free_is_an_invalid_pointer() {
    let queue = SimQueue::host(4096);
    let ptr = queue.allocate(64).unwrap();
    queue.deallocate(ptr).unwrap();
    assert!(matches!(queue.deallocate(ptr), Err(DeviceError::InvalidPointer { .. })));
}

#[test]
fn pointers_are_unique_and_non_null() {
    let queue = SimQueue::host(4096);
    let a = queue.allocate(8).unwrap();
    let b = queue.allocate(8).unwrap();
    assert_ne!(a, b);
    assert!(!a.is_null());
}

#[test]
fn write_then_read_returns_contents() {
    let queue = SimQueue::accelerator(3, 4096);
    let ptr = queue.allocate(4).unwrap();
    queue.write(ptr, &[1, 2, 3, 4]).unwrap();
    let mut out = [0u8; 4];
    queue.read(ptr, &mut out).unwrap();
    assert_eq!(out, [1, 2, 3, 4]);
    assert_eq!(queue.write_count(), 1);
    assert_eq!(queue.read_count(), 1);
}

#[test]
fn size_mismatch_is_rejected() {
    let queue = SimQueue::host(4096);
    let ptr = queue.allocate(4).unwrap();
    let result = queue.write(ptr, &[1, 2]);
    assert_eq!(result, Err(DeviceError::SizeMismatch { expected: 4, actual: 2 }));
}

#[test]
fn copy_from_stages_across_devices() {
    let host = SimQueue::host(4096);
    let dev = SimQueue::accelerator(0, 4096);
    let src = host.allocate(3).unwrap();
    host.write(src, &[9, 8, 7]).unwrap();
    let dst = dev.allocate(3).unwrap();

    dev.copy_from(&host, src, dst, 3).unwrap();

    let mut out = [0u8; 3];
    dev.read(dst, &mut out).unwrap();
    assert_eq!(out, [9, 8, 7]);
}

#[test]
fn queue_identity_is_by_path() {
    let a = SimQueue::accelerator(0, 16);
    let b = SimQueue::accelerator(0, 32);
    let c = SimQueue::accelerator(1, 16);
    assert!(queue_eq(&a, &b));
    assert!(!queue_eq(&a, &c));
}
