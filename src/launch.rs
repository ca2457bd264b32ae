// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Walk driver for kernel launches.
//!
//! Visits a kernel's captured arguments in declaration order with one
//! walker and stops at the first error. `Launcher` strings the walkers
//! together: choose a queue, marshal onto it, or run on the host inside
//! an explicit swap-in / swap-out bracket.

use std::str::FromStr;
use std::sync::Arc;

use crate::buffer::BufferDescriptor;
use crate::device::{DevicePtr, QueueRef};
use crate::error::{MarshalError, Result};
use crate::kernel::ArgumentList;
use crate::telemetry::{LaunchSpan, SpanExt};
use crate::walker::{ArgumentAppender, BufferWalker, QueueSelector, ResidencySwapper};

/// One argument captured by a kernel, in declaration order.
#[derive(Debug, Clone)]
pub enum CapturedArg {
    Value(Vec<u8>),
    Pointer { size: usize, ptr: DevicePtr },
    Buffer { descriptor: Arc<BufferDescriptor>, will_modify: bool, is_array: bool },
}

impl CapturedArg {
    pub fn value(bytes: impl Into<Vec<u8>>) -> Self {
        CapturedArg::Value(bytes.into())
    }

    pub fn pointer(size: usize, ptr: DevicePtr) -> Self {
        CapturedArg::Pointer { size, ptr }
    }

    pub fn buffer(descriptor: &Arc<BufferDescriptor>, will_modify: bool, is_array: bool) -> Self {
        CapturedArg::Buffer { descriptor: descriptor.clone(), will_modify, is_array }
    }

    /// Read-only array argument.
    pub fn read(descriptor: &Arc<BufferDescriptor>) -> Self {
        Self::buffer(descriptor, false, true)
    }

    /// Written array argument.
    pub fn write(descriptor: &Arc<BufferDescriptor>) -> Self {
        Self::buffer(descriptor, true, true)
    }

    fn kind(&self) -> &'static str {
        match self {
            CapturedArg::Value(_) => "value",
            CapturedArg::Pointer { .. } => "pointer",
            CapturedArg::Buffer { .. } => "buffer",
        }
    }
}

/// Visit `args` in order, aborting on the first error.
pub fn walk(args: &[CapturedArg], walker: &mut dyn BufferWalker) -> Result<()> {
    for (index, arg) in args.iter().enumerate() {
        tracing::trace!(index, kind = arg.kind(), "visit");
        match arg {
            CapturedArg::Value(bytes) => walker.append(bytes)?,
            CapturedArg::Pointer { size, ptr } => walker.append_ptr(*size, *ptr)?,
            CapturedArg::Buffer { descriptor, will_modify, is_array } => {
                walker.push(descriptor, *will_modify, *is_array)?
            }
        }
    }
    Ok(())
}

/// Launch target used when no array argument is staged on an accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackTarget {
    #[default]
    Host,
    /// The only accelerator if exactly one is registered, the host otherwise.
    SoleAccelerator,
}

impl FallbackTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackTarget::Host => "host",
            FallbackTarget::SoleAccelerator => "sole-accelerator",
        }
    }
}

impl FromStr for FallbackTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" | "cpu" => Ok(Self::Host),
            "sole-accelerator" | "sole_accelerator" => Ok(Self::SoleAccelerator),
            other => Err(format!("unknown fallback target: {}", other)),
        }
    }
}

/// Launcher configuration.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    pub fallback: FallbackTarget,
}

/// Drives walks over the registered queues.
pub struct Launcher {
    host: QueueRef,
    accelerators: Vec<QueueRef>,
    config: LaunchConfig,
}

impl Launcher {
    pub fn new(host: QueueRef, accelerators: Vec<QueueRef>, config: LaunchConfig) -> Self {
        Self { host, accelerators, config }
    }

    pub fn host(&self) -> &QueueRef {
        &self.host
    }

    pub fn accelerators(&self) -> &[QueueRef] {
        &self.accelerators
    }

    /// Pick the execution queue.
    ///
    /// An explicit queue wins; otherwise the device holding most of the
    /// kernel's arrays; otherwise the configured fallback.
    pub fn select_queue(&self, args: &[CapturedArg], explicit: Option<&QueueRef>) -> QueueRef {
        if let Some(queue) = explicit {
            return queue.clone();
        }

        let mut selector = QueueSelector::new();
        match walk(args, &mut selector) {
            Ok(()) => {
                if let Some(best) = selector.best() {
                    tracing::debug!(device = %best.device_path(), "selected by locality");
                    return best;
                }
            }
            Err(e) => tracing::warn!(error = %e, "selector walk failed"),
        }
        self.fallback_queue()
    }

    fn fallback_queue(&self) -> QueueRef {
        match (self.config.fallback, self.accelerators.as_slice()) {
            (FallbackTarget::SoleAccelerator, [only]) => only.clone(),
            _ => self.host.clone(),
        }
    }

    /// Synchronize every buffer onto `queue` and build its argument list.
    ///
    /// `kernel` must start empty. On failure, including an out-of-order
    /// slot, `kernel` is cleared; no partial argument list survives.
    pub fn marshal(
        &self,
        args: &[CapturedArg],
        queue: &QueueRef,
        kernel: &mut ArgumentList,
    ) -> Result<()> {
        let span = LaunchSpan::new("appender", &queue.device_path().to_string(), args.len());
        let _enter = span.enter();

        let result = {
            let mut appender = ArgumentAppender::new(queue.clone(), kernel);
            walk(args, &mut appender)
        }
        .and_then(|()| match kernel.error() {
            Some(e) => Err(MarshalError::Kernel(e.clone())),
            None => Ok(()),
        });
        if result.is_err() {
            kernel.clear();
        }
        span.record_result(&result);
        result
    }

    /// Select a queue and marshal onto it, returning the chosen queue.
    pub fn launch(
        &self,
        args: &[CapturedArg],
        explicit: Option<&QueueRef>,
        kernel: &mut ArgumentList,
    ) -> Result<QueueRef> {
        let queue = self.select_queue(args, explicit);
        self.marshal(args, &queue, kernel)?;
        Ok(queue)
    }

    /// Run `body` against host memory.
    ///
    /// Swap-in walk, then `body`, then an independent swap-out walk that
    /// restores every logical pointer before returning. If swap-in fails,
    /// its swaps are rolled back and `body` never runs. If `body` panics,
    /// the swap-in is rolled back while unwinding.
    pub fn execute_on_host<T>(&self, args: &[CapturedArg], body: impl FnOnce() -> T) -> Result<T> {
        let span = LaunchSpan::new("swapper", &self.host.device_path().to_string(), args.len());
        let _enter = span.enter();

        let mut guard = SwapGuard {
            swapper: ResidencySwapper::new(self.host.clone()),
            armed: true,
        };
        if let Err(e) = walk(args, &mut guard.swapper) {
            let result: Result<T> = Err(e);
            span.record_result(&result);
            return result;
        }

        let out = body();
        guard.armed = false;

        let mut swap_out = ResidencySwapper::new(self.host.clone());
        let result = walk(args, &mut swap_out).map(|()| out);
        span.record_result(&result);
        result
    }
}

/// Undoes a swap-in walk unless disarmed once the body has returned.
struct SwapGuard {
    swapper: ResidencySwapper,
    armed: bool,
}

impl Drop for SwapGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.swapper.rollback() {
            tracing::warn!(error = %e, "swap-in rollback failed");
        }
    }
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
