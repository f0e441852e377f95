// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tick scheduler
//!
//! Drives one core through RUNNING -> PAUSING -> PAUSED -> RUNNING. The timer
//! handler ([`TickScheduler::on_timer_event`]) does the time-critical input
//! processing synchronously and hands the neuron update to a
//! [`DeferredExecutor`]. The host later runs each admitted task through
//! [`TickScheduler::run_background`].

use nmslice_neural::ChannelShaper;
use nmslice_runtime::{
    Admission, BackgroundQueueStats, BackgroundTask, BackgroundTracker, CommonCollaborator,
    CriticalSection, DeferredExecutor, InterruptControl, InterruptMask, NeuronCollaborator,
    Priority, RingBuffer, RuntimeError, SlotQueue, SynapseCollaborator,
};
use tracing::{debug, error, info, trace, warn};

use crate::clock::SimulationClock;
use crate::error::{Result, TickError};
use crate::provenance::{ProvenanceRecord, ProvenanceSink};
use crate::time_critical::process_ring_buffers;

/// Lifecycle state of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    /// Transient: limit reached, pause sequence in progress
    Pausing,
    Paused,
    /// Terminal: the resume hook failed and collaborator state is unknown
    Failed,
}

/// What a timer event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Neuron update admitted for `tick`
    Submitted { tick: u32 },
    /// Background executor refused the neuron update for `tick`
    Overloaded { tick: u32 },
    /// Limit reached; the core paused with the clock rolled back to `tick`
    Paused { tick: u32 },
    /// Scheduler was not running
    Ignored,
}

/// The collaborators a scheduler drives
pub struct Collaborators {
    pub neuron: Box<dyn NeuronCollaborator>,
    pub synapses: Box<dyn SynapseCollaborator>,
    pub common: Box<dyn CommonCollaborator>,
}

impl Collaborators {
    pub fn new(
        neuron: Box<dyn NeuronCollaborator>,
        synapses: Box<dyn SynapseCollaborator>,
        common: Box<dyn CommonCollaborator>,
    ) -> Self {
        Self {
            neuron,
            synapses,
            common,
        }
    }
}

/// Resume strategy, called with the tick the run continues from
pub type ResumeHook =
    Box<dyn FnMut(&mut Collaborators, u32) -> std::result::Result<(), RuntimeError> + Send>;

/// Reset recording, restore the neuron state, restart synapses at `next_tick`
pub fn default_resume_hook(
    collaborators: &mut Collaborators,
    next_tick: u32,
) -> std::result::Result<(), RuntimeError> {
    collaborators.common.reset_recording();
    collaborators.neuron.resume()?;
    collaborators.synapses.resume(next_tick);
    Ok(())
}

/// Run parameters for a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedulerConfig {
    pub simulation_ticks: u32,
    pub infinite_run: bool,
    pub background_priority: Priority,
}

impl Default for TickSchedulerConfig {
    fn default() -> Self {
        Self {
            simulation_ticks: 0,
            infinite_run: false,
            background_priority: Priority::BACKGROUND,
        }
    }
}

/// Everything except the interrupt controller, so a critical section can
/// borrow the controller while the body mutates the rest
struct SchedulerCore<D> {
    clock: SimulationClock,
    state: SchedulerState,
    ring_buffer: RingBuffer,
    shaper: ChannelShaper,
    tracker: BackgroundTracker,
    executor: D,
    collaborators: Collaborators,
    background_priority: Priority,
    resume_hook: ResumeHook,
    resume_armed: bool,
    provenance_sink: Option<Box<dyn ProvenanceSink>>,
    finalized: bool,
}

impl<D: DeferredExecutor> SchedulerCore<D> {
    fn pause_at_limit(&mut self) -> u32 {
        self.state = SchedulerState::Pausing;
        self.resume_armed = true;

        self.collaborators.neuron.pause();
        self.collaborators.common.pause();

        self.clock.rollback();
        let tick = self.clock.tick();
        self.collaborators.common.ready_to_read();

        self.state = SchedulerState::Paused;
        info!(
            "[TICK-ENGINE] Paused at tick {} (max_backgrounds_queued={}, overloads={})",
            tick,
            self.tracker.max_backgrounds_queued(),
            self.tracker.n_background_overloads()
        );
        tick
    }

    fn submit_background(&mut self, tick: u32, timer_count: u32) -> TickOutcome {
        let task = BackgroundTask { timer_count, tick };
        match self
            .tracker
            .submit(&mut self.executor, task, self.background_priority)
        {
            Admission::Admitted => TickOutcome::Submitted { tick },
            Admission::Rejected => {
                let overloads = self.tracker.n_background_overloads();
                if overloads == 1 {
                    warn!(
                        "[TICK-ENGINE] Background queue full at tick {}; neuron update skipped",
                        tick
                    );
                } else {
                    debug!(
                        "[TICK-ENGINE] Background overload at tick {} (total {})",
                        tick, overloads
                    );
                }
                TickOutcome::Overloaded { tick }
            }
        }
    }
}

/// Per-core tick scheduler
pub struct TickScheduler<I: InterruptControl, D: DeferredExecutor> {
    interrupts: I,
    core: SchedulerCore<D>,
}

impl<I: InterruptControl, D: DeferredExecutor> TickScheduler<I, D> {
    /// Build a scheduler in the RUNNING state with the clock before tick 0
    pub fn new(
        config: TickSchedulerConfig,
        ring_buffer: RingBuffer,
        shaper: ChannelShaper,
        interrupts: I,
        executor: D,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let layout = ring_buffer.layout();
        if shaper.n_neurons() as u64 > layout.max_neurons() as u64 {
            return Err(TickError::Configuration(format!(
                "{} neurons do not fit {} neuron index bits",
                shaper.n_neurons(),
                layout.neuron_index_bits()
            )));
        }
        if shaper.n_channels() as u64 > layout.max_channels() as u64 {
            return Err(TickError::Configuration(format!(
                "{} channels do not fit {} type bits",
                shaper.n_channels(),
                layout.type_bits()
            )));
        }

        info!(
            "[TICK-ENGINE] Initialised: {} neurons x {} channels, ring buffer {} slots, limit {} ticks{}",
            shaper.n_neurons(),
            shaper.n_channels(),
            layout.size(),
            config.simulation_ticks,
            if config.infinite_run { " (infinite)" } else { "" }
        );

        Ok(Self {
            interrupts,
            core: SchedulerCore {
                clock: SimulationClock::new(config.simulation_ticks, config.infinite_run),
                state: SchedulerState::Running,
                ring_buffer,
                shaper,
                tracker: BackgroundTracker::new(),
                executor,
                collaborators,
                background_priority: config.background_priority,
                resume_hook: Box::new(default_resume_hook),
                resume_armed: false,
                provenance_sink: None,
                finalized: false,
            },
        })
    }

    /// Replace the default resume strategy
    pub fn with_resume_hook(mut self, hook: ResumeHook) -> Self {
        self.core.resume_hook = hook;
        self
    }

    /// Where [`TickScheduler::finalize`] writes the record
    pub fn with_provenance_sink(mut self, sink: Box<dyn ProvenanceSink>) -> Self {
        self.core.provenance_sink = Some(sink);
        self
    }

    /// Handle one periodic timer event
    pub fn on_timer_event(&mut self) -> TickOutcome {
        let timer_count = self.core.clock.count_timer_event();
        if self.core.state != SchedulerState::Running {
            trace!(
                "[TICK-ENGINE] Timer event {} ignored while {:?}",
                timer_count,
                self.core.state
            );
            return TickOutcome::Ignored;
        }

        let all = CriticalSection::enter(&self.interrupts, InterruptMask::All);
        let tick = self.core.clock.advance();
        self.core.collaborators.common.clear_input_buffer(tick);
        all.exit();

        let _irq = CriticalSection::enter(&self.interrupts, InterruptMask::Irq);
        process_ring_buffers(tick, &mut self.core.ring_buffer, &mut self.core.shaper);

        if self.core.clock.is_finished() {
            let paused_at = self.core.pause_at_limit();
            return TickOutcome::Paused { tick: paused_at };
        }

        trace!("[TICK-ENGINE] Tick {} (timer {})", tick, timer_count);
        self.core.submit_background(tick, timer_count)
    }

    /// Body of an admitted background task
    pub fn run_background(&mut self, task: BackgroundTask) {
        let core = &mut self.core;
        core.collaborators.synapses.do_structural_update(task.tick);
        core.collaborators
            .neuron
            .do_timestep_update(task.tick, task.timer_count, &core.shaper);
        core.tracker.complete();
    }

    /// Leave PAUSED and continue from the tick after the rollback point
    ///
    /// `run_length` replaces the tick limit and infinite flag once the resume
    /// hook succeeds. A failing hook is fatal: the scheduler enters `Failed`,
    /// the run length is left untouched and every later resume is rejected.
    pub fn resume(&mut self, run_length: Option<(u32, bool)>) -> Result<()> {
        let core = &mut self.core;
        if core.state != SchedulerState::Paused || !core.resume_armed {
            return Err(TickError::InvalidTransition {
                state: core.state,
                action: "resume",
            });
        }

        let next_tick = core.clock.tick().wrapping_add(1);
        core.resume_armed = false;
        if let Err(e) = (core.resume_hook)(&mut core.collaborators, next_tick) {
            core.state = SchedulerState::Failed;
            error!("[TICK-ENGINE] Resume failed, scheduler halted: {}", e);
            return Err(TickError::ResumeFailed(e));
        }

        if let Some((simulation_ticks, infinite_run)) = run_length {
            core.clock.set_run_length(simulation_ticks, infinite_run);
        }
        core.state = SchedulerState::Running;
        info!(
            "[TICK-ENGINE] Resumed from tick {} (limit {})",
            next_tick,
            core.clock.simulation_ticks()
        );
        Ok(())
    }

    /// Collect provenance from collaborators and counters, once
    pub fn finalize(&mut self) -> Result<ProvenanceRecord> {
        let core = &mut self.core;
        if core.finalized {
            return Err(TickError::AlreadyFinalized);
        }

        let record = ProvenanceRecord::new(
            core.collaborators.neuron.provenance().0,
            core.collaborators.synapses.provenance().0,
            core.tracker.stats(),
            core.clock.tick().wrapping_add(1),
        );
        if let Some(sink) = core.provenance_sink.as_mut() {
            sink.store(&record)?;
        }
        core.finalized = true;
        debug!(
            "[TICK-ENGINE] Provenance written ({} words)",
            record.to_words().len()
        );
        Ok(record)
    }

    /// Inbound delivery: `weight` arrives `delay` ticks after the current tick
    pub fn deliver(&mut self, delay: u32, channel: u32, neuron: u32, weight: nmslice_neural::Accum) -> Result<()> {
        let tick = self.core.clock.tick();
        self.core
            .ring_buffer
            .schedule(tick, delay, channel, neuron, weight)?;
        Ok(())
    }

    pub fn state(&self) -> SchedulerState {
        self.core.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.core.clock
    }

    pub fn background_stats(&self) -> BackgroundQueueStats {
        self.core.tracker.stats()
    }

    pub fn shaper(&self) -> &ChannelShaper {
        &self.core.shaper
    }

    pub fn ring_buffer(&self) -> &RingBuffer {
        &self.core.ring_buffer
    }

    /// Direct access for upstream synapse processing
    pub fn ring_buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.core.ring_buffer
    }

    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }

    pub fn executor(&self) -> &D {
        &self.core.executor
    }

    pub fn executor_mut(&mut self) -> &mut D {
        &mut self.core.executor
    }

    pub fn collaborators_mut(&mut self) -> &mut Collaborators {
        &mut self.core.collaborators
    }
}

impl<I: InterruptControl> TickScheduler<I, SlotQueue> {
    /// Run every pending background task in priority order
    pub fn run_pending_background(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.core.executor.pop_next() {
            self.run_background(task);
            ran += 1;
        }
        ran
    }
}
