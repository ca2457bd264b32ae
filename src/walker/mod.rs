// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Kernel-argument walkers.
//!
//! Launch glue visits captured arguments in declaration order and calls
//! `append`, `append_ptr` or `push` on whichever walker is active:
//!
//! ```text
//! Walker
//! ├── ArgumentAppender  (native argument list for a target queue)
//! ├── ResidencySwapper  (host-execution pointer exchange)
//! └── QueueSelector     (locality-aware device choice)
//! ```

mod appender;
mod selector;
mod swapper;

use std::sync::Arc;

pub use appender::ArgumentAppender;
pub use selector::QueueSelector;
pub use swapper::ResidencySwapper;

use crate::buffer::BufferDescriptor;
use crate::device::{DevicePtr, QueueRef};
use crate::error::Result;

/// Three-operation interface shared by every walker.
pub trait BufferWalker {
    /// Marshal a value argument.
    fn append(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    /// Marshal a raw device pointer. No synchronization is performed.
    fn append_ptr(&mut self, _size: usize, _ptr: DevicePtr) -> Result<()> {
        Ok(())
    }

    /// Marshal a container argument.
    fn push(
        &mut self,
        descriptor: &Arc<BufferDescriptor>,
        will_modify: bool,
        is_array: bool,
    ) -> Result<()>;
}

/// Closed set of walkers behind one facade.
pub enum Walker<'k> {
    Appender(ArgumentAppender<'k>),
    Swapper(ResidencySwapper),
    Selector(QueueSelector),
}

impl<'k> Walker<'k> {
    pub fn selector() -> Self {
        Walker::Selector(QueueSelector::new())
    }

    pub fn swapper(host: QueueRef) -> Self {
        Walker::Swapper(ResidencySwapper::new(host))
    }

    pub fn appender(queue: QueueRef, kernel: &'k mut dyn crate::kernel::KernelHandle) -> Self {
        Walker::Appender(ArgumentAppender::new(queue, kernel))
    }

    /// Selection result, for the selector variant only.
    pub fn best(&self) -> Option<QueueRef> {
        match self {
            Walker::Selector(s) => s.best(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Walker::Appender(_) => "appender",
            Walker::Swapper(_) => "swapper",
            Walker::Selector(_) => "selector",
        }
    }
}

impl BufferWalker for Walker<'_> {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Walker::Appender(w) => w.append(bytes),
            Walker::Swapper(w) => w.append(bytes),
            Walker::Selector(w) => w.append(bytes),
        }
    }

    fn append_ptr(&mut self, size: usize, ptr: DevicePtr) -> Result<()> {
        match self {
            Walker::Appender(w) => w.append_ptr(size, ptr),
            Walker::Swapper(w) => w.append_ptr(size, ptr),
            Walker::Selector(w) => w.append_ptr(size, ptr),
        }
    }

    fn push(
        &mut self,
        descriptor: &Arc<BufferDescriptor>,
        will_modify: bool,
        is_array: bool,
    ) -> Result<()> {
        match self {
            Walker::Appender(w) => w.push(descriptor, will_modify, is_array),
            Walker::Swapper(w) => w.push(descriptor, will_modify, is_array),
            Walker::Selector(w) => w.push(descriptor, will_modify, is_array),
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
