// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Background task admission.

The platform offers a non-blocking deferred-execution primitive: a task is
either accepted immediately (and runs later on the same core, at the given
priority) or rejected immediately. [`BackgroundTracker`] wraps that primitive
with the accounting the provenance record reports:

- outstanding tasks (admitted, not yet completed)
- high-water mark of outstanding tasks
- number of rejected admissions

A rejected task is dropped for that tick. It is never retried.
*/

use alloc::collections::VecDeque;

/// Callback priority; lower values pre-empt higher ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Fast interrupt (inbound packets)
    pub const FIQ: Priority = Priority(-1);
    /// Timer and DMA callbacks
    pub const TIMER: Priority = Priority(0);
    /// Deferred per-tick work (neuron update, structural plasticity)
    pub const BACKGROUND: Priority = Priority(1);
    /// Generic maintenance work
    pub const MAINTENANCE: Priority = Priority(2);
}

/// Deferred per-tick work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundTask {
    /// Number of timer events since the run started
    pub timer_count: u32,
    /// Tick the work belongs to
    pub tick: u32,
}

/// Platform deferred-execution primitive
pub trait DeferredExecutor {
    /// Offer a task; `true` if it was accepted. Never blocks.
    fn submit(&mut self, task: BackgroundTask, priority: Priority) -> bool;
}

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Task accepted and counted as outstanding
    Admitted,
    /// Task rejected and counted as an overload
    Rejected,
}

/// Snapshot of the tracker counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackgroundQueueStats {
    /// Outstanding tasks
    pub n_backgrounds_queued: u32,
    /// Largest value `n_backgrounds_queued` ever reached
    pub max_backgrounds_queued: u32,
    /// Rejected admissions
    pub n_background_overloads: u32,
}

/// Admission control and overload accounting for background work
#[derive(Debug, Clone, Default)]
pub struct BackgroundTracker {
    stats: BackgroundQueueStats,
}

impl BackgroundTracker {
    /// Tracker with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `task` to `executor` and account for the outcome
    pub fn submit<E: DeferredExecutor + ?Sized>(
        &mut self,
        executor: &mut E,
        task: BackgroundTask,
        priority: Priority,
    ) -> Admission {
        if executor.submit(task, priority) {
            self.stats.n_backgrounds_queued += 1;
            if self.stats.n_backgrounds_queued > self.stats.max_backgrounds_queued {
                self.stats.max_backgrounds_queued = self.stats.n_backgrounds_queued;
            }
            Admission::Admitted
        } else {
            self.stats.n_background_overloads = self.stats.n_background_overloads.saturating_add(1);
            Admission::Rejected
        }
    }

    /// Completion point of an admitted task
    pub fn complete(&mut self) {
        debug_assert!(
            self.stats.n_backgrounds_queued > 0,
            "background completion without admission"
        );
        self.stats.n_backgrounds_queued = self.stats.n_backgrounds_queued.saturating_sub(1);
    }

    /// Outstanding tasks
    pub fn n_backgrounds_queued(&self) -> u32 {
        self.stats.n_backgrounds_queued
    }

    /// High-water mark of outstanding tasks
    pub fn max_backgrounds_queued(&self) -> u32 {
        self.stats.max_backgrounds_queued
    }

    /// Rejected admissions
    pub fn n_background_overloads(&self) -> u32 {
        self.stats.n_background_overloads
    }

    /// Copy of all counters
    pub fn stats(&self) -> BackgroundQueueStats {
        self.stats
    }
}

/// Host model of the deferred-execution primitive
///
/// Holds at most `slots` pending tasks. [`SlotQueue::pop_next`] hands back the
/// most urgent pending task (lowest priority value, FIFO within a priority),
/// which the host then runs.
#[derive(Debug, Clone)]
pub struct SlotQueue {
    slots: usize,
    pending: VecDeque<(Priority, BackgroundTask)>,
}

impl SlotQueue {
    /// Queue with room for `slots` pending tasks
    pub fn new(slots: usize) -> Self {
        Self {
            slots,
            pending: VecDeque::with_capacity(slots),
        }
    }

    /// Next task to execute
    pub fn pop_next(&mut self) -> Option<BackgroundTask> {
        let best = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(position, (priority, _))| (*priority, *position))
            .map(|(position, _)| position)?;
        self.pending.remove(best).map(|(_, task)| task)
    }

    /// Pending task count
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Configured slot count
    pub fn slots(&self) -> usize {
        self.slots
    }
}

impl DeferredExecutor for SlotQueue {
    fn submit(&mut self, task: BackgroundTask, priority: Priority) -> bool {
        if self.pending.len() >= self.slots {
            return false;
        }
        self.pending.push_back((priority, task));
        true
    }
}
