//! TDD-Light tests for the synchronization protocol.

use coherence_core::{
    BufferDescriptor, DevicePath, DeviceQueue, MarshalError, QueueRef, SimQueue, SyncMode,
};
use std::sync::Arc;
use std::thread;

fn accel(index: u32) -> Arc<SimQueue> {
    Arc::new(SimQueue::accelerator(index, 1 << 20))
}

fn as_ref(queue: &Arc<SimQueue>) -> QueueRef {
    queue.clone()
}

#[test]
fn repeated_source_sync_transfers_once() {
    let a = accel(0);
    let b = accel(1);
    let desc = BufferDescriptor::new(as_ref(&a), &[1, 2, 3, 4], true).unwrap();

    desc.sync(&as_ref(&b), SyncMode::source()).unwrap();
    desc.sync(&as_ref(&b), SyncMode::source()).unwrap();

    assert_eq!(desc.transfer_count(), 1);
}

#[test]
fn write_makes_other_copies_stale_until_resynced() {
    let a = accel(0);
    let b = accel(1);
    let desc = BufferDescriptor::new(as_ref(&a), &[1; 64], true).unwrap();

    desc.sync(&as_ref(&b), SyncMode::write()).unwrap();
    let valid: Vec<DevicePath> =
        desc.residency().into_iter().filter(|r| r.valid).map(|r| r.device).collect();
    assert_eq!(valid, vec![b.device_path()]);

    let before = desc.transfer_count();
    desc.sync(&as_ref(&a), SyncMode::source()).unwrap();
    assert_eq!(desc.transfer_count(), before + 1);
}

#[test]
fn data_follows_the_freshest_copy() {
    let a = accel(0);
    let b = accel(1);
    let host: QueueRef = Arc::new(SimQueue::host(1 << 20));
    let desc = BufferDescriptor::new(as_ref(&a), &[0; 4], true).unwrap();

    desc.sync(&as_ref(&b), SyncMode::write()).unwrap();
    let ptr = desc.device_ptr(&b.device_path()).unwrap();
    b.write(ptr, &[9, 9, 9, 9]).unwrap();

    assert_eq!(desc.read_to_vec(&host).unwrap(), vec![9, 9, 9, 9]);
    assert_eq!(desc.read_to_vec(&as_ref(&a)).unwrap(), vec![9, 9, 9, 9]);
}

#[test]
fn host_master_array_only_syncs_to_stage() {
    let host: QueueRef = Arc::new(SimQueue::host(1 << 20));
    let a = accel(0);
    let b = accel(1);
    let staged = BufferDescriptor::staging(host, as_ref(&a), &[1; 4]).unwrap();

    assert!(staged.sync(&as_ref(&a), SyncMode::read()).is_ok());
    let result = staged.sync(&as_ref(&b), SyncMode::read());
    assert!(matches!(result, Err(MarshalError::UnsupportedAccelerator { .. })));
}

#[test]
fn policy_error_names_devices() {
    let host: QueueRef = Arc::new(SimQueue::host(1 << 20));
    let a = accel(0);
    let desc = BufferDescriptor::new(host, &[1; 4], true).unwrap();

    let message = desc.sync(&as_ref(&a), SyncMode::write()).unwrap_err().to_string();

    assert!(message.contains("Unsupported accelerator"));
    assert!(message.contains("cpu"));
    assert!(message.contains("sim:0"));
}

#[test]
fn concurrent_readers_serialize_on_descriptor() {
    let origin = accel(0);
    let desc = BufferDescriptor::new(as_ref(&origin), &[5; 256], true).unwrap();
    let readers: Vec<Arc<SimQueue>> = (1..=4).map(accel).collect();

    let handles: Vec<_> = readers
        .iter()
        .map(|q| {
            let desc = desc.clone();
            let q = as_ref(q);
            thread::spawn(move || {
                for _ in 0..10 {
                    desc.sync(&q, SyncMode::read()).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(desc.transfer_count(), 4);
    for q in &readers {
        assert!(desc.is_valid_on(&q.device_path()));
        assert_eq!(q.write_count(), 1);
    }
}
