// Copyright 2024-2026 Coherence-Core Contributors
// Licensed under the Apache License, Version 2.0

//! Queue selector: picks the device holding most of a kernel's arrays.

use std::sync::Arc;

use super::BufferWalker;
use crate::buffer::BufferDescriptor;
use crate::device::QueueRef;
use crate::error::Result;

/// Tallies the stage device of every array argument not staged on the host.
#[derive(Default)]
pub struct QueueSelector {
    collector: Vec<QueueRef>,
}

impl QueueSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded candidates in visitation order.
    pub fn candidates(&self) -> &[QueueRef] {
        &self.collector
    }

    /// Queue of the longest run of equal devices after sorting by path.
    ///
    /// Ties go to the run that sorts first.
    pub fn best(&self) -> Option<QueueRef> {
        let mut sorted: Vec<&QueueRef> = self.collector.iter().collect();
        sorted.sort_by_key(|q| q.device_path());

        let mut best: Option<(&QueueRef, usize)> = None;
        let mut i = 0;
        while i < sorted.len() {
            let head = sorted[i].device_path();
            let mut run = 1;
            while i + run < sorted.len() && sorted[i + run].device_path() == head {
                run += 1;
            }
            if best.map_or(true, |(_, max)| run > max) {
                best = Some((sorted[i], run));
            }
            i += run;
        }
        best.map(|(queue, _)| queue.clone())
    }
}

impl BufferWalker for QueueSelector {
    fn push(
        &mut self,
        descriptor: &Arc<BufferDescriptor>,
        _will_modify: bool,
        is_array: bool,
    ) -> Result<()> {
        if !is_array {
            return Ok(());
        }
        let stage = descriptor.stage_queue();
        if !stage.device_path().is_host() {
            self.collector.push(stage);
        }
        Ok(())
    }
}
