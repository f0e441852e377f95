// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Multi-run lifecycle: run, pause, resume with a new limit, finalise

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use nmslice_neural::{Accum, ChannelParams, ChannelShaper, Decay, OverflowPolicy};
use nmslice_runtime::{
    CommonCollaborator, HostInterrupts, NeuronCollaborator, ProvenanceBlock, RingBuffer,
    RingBufferLayout, RuntimeError, SlotQueue, SynapseCollaborator,
};
use nmslice_tick_engine::{
    Collaborators, ProvenanceRecord, SchedulerState, TickOutcome, TickScheduler,
    TickSchedulerConfig,
};
use proptest::prelude::*;

#[derive(Default)]
struct Counters {
    updates: AtomicU32,
    last_tick: AtomicU32,
    ready: AtomicU32,
    peak_input: AtomicU32,
}

struct Neuron(Arc<Counters>);

impl NeuronCollaborator for Neuron {
    fn pause(&mut self) {}
    fn resume(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }
    fn do_timestep_update(&mut self, tick: u32, _timer_count: u32, inputs: &ChannelShaper) {
        self.0.updates.fetch_add(1, Ordering::Relaxed);
        self.0.last_tick.store(tick, Ordering::Relaxed);
        let bits = inputs.value(0, 0).unwrap().to_bits().max(0) as u32;
        self.0.peak_input.fetch_max(bits, Ordering::Relaxed);
    }
    fn provenance(&self) -> ProvenanceBlock {
        ProvenanceBlock::from_words(vec![self.0.updates.load(Ordering::Relaxed)])
    }
}

struct Synapses;

impl SynapseCollaborator for Synapses {
    fn resume(&mut self, _next_tick: u32) {}
    fn do_structural_update(&mut self, _tick: u32) {}
    fn provenance(&self) -> ProvenanceBlock {
        ProvenanceBlock::default()
    }
}

struct Common(Arc<Counters>);

impl CommonCollaborator for Common {
    fn pause(&mut self) {}
    fn reset_recording(&mut self) {}
    fn ready_to_read(&mut self) {
        self.0.ready.fetch_add(1, Ordering::Relaxed);
    }
}

fn build(
    ticks: u32,
    slots: usize,
) -> (TickScheduler<HostInterrupts, SlotQueue>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let layout = RingBufferLayout::new(1, 4, 4).unwrap();
    let params = ChannelParams::new(Decay::from_num(0.5), Decay::from_num(0.5));
    let scheduler = TickScheduler::new(
        TickSchedulerConfig {
            simulation_ticks: ticks,
            ..Default::default()
        },
        RingBuffer::new(layout, OverflowPolicy::Saturate),
        ChannelShaper::uniform(16, &[params, params]),
        HostInterrupts::new(),
        SlotQueue::new(slots),
        Collaborators::new(
            Box::new(Neuron(counters.clone())),
            Box::new(Synapses),
            Box::new(Common(counters.clone())),
        ),
    )
    .unwrap();
    (scheduler, counters)
}

/// Fire timer events until the scheduler pauses, draining background work
/// after each event. Returns the ticks that were processed.
fn run_to_pause(scheduler: &mut TickScheduler<HostInterrupts, SlotQueue>) -> Vec<u32> {
    let mut ticks = Vec::new();
    loop {
        match scheduler.on_timer_event() {
            TickOutcome::Submitted { tick } | TickOutcome::Overloaded { tick } => ticks.push(tick),
            TickOutcome::Paused { .. } => break,
            TickOutcome::Ignored => panic!("timer ignored while running"),
        }
        scheduler.run_pending_background();
    }
    ticks
}

#[test]
fn test_two_runs_continue_tick_sequence() {
    let (mut scheduler, counters) = build(5, 4);

    assert_eq!(run_to_pause(&mut scheduler), vec![0, 1, 2, 3, 4]);
    assert_eq!(scheduler.clock().tick(), 4);
    assert_eq!(counters.ready.load(Ordering::Relaxed), 1);

    scheduler.resume(Some((8, false))).unwrap();
    assert_eq!(run_to_pause(&mut scheduler), vec![5, 6, 7]);
    assert_eq!(counters.ready.load(Ordering::Relaxed), 2);
    assert_eq!(counters.updates.load(Ordering::Relaxed), 8);
    assert_eq!(counters.last_tick.load(Ordering::Relaxed), 7);
}

#[test]
fn test_delayed_input_visible_to_neuron_update() {
    let (mut scheduler, counters) = build(6, 4);
    scheduler.on_timer_event();
    scheduler.run_pending_background();
    scheduler.deliver(3, 0, 0, Accum::from_num(8)).unwrap();
    run_to_pause(&mut scheduler);

    // 8 * 0.5 on arrival
    assert_eq!(
        counters.peak_input.load(Ordering::Relaxed),
        Accum::from_num(4).to_bits() as u32
    );
}

#[test]
fn test_finalize_after_pause_serialises() {
    let (mut scheduler, _) = build(3, 4);
    run_to_pause(&mut scheduler);
    assert_eq!(scheduler.state(), SchedulerState::Paused);

    let captured = Arc::new(std::sync::Mutex::new(None));
    let sink_slot = captured.clone();
    let mut scheduler = scheduler.with_provenance_sink(Box::new(
        move |record: &ProvenanceRecord| -> nmslice_tick_engine::Result<()> {
            *sink_slot.lock().unwrap() = Some(serde_json::to_string(record).unwrap());
            Ok(())
        },
    ));
    let record = scheduler.finalize().unwrap();
    assert_eq!(record.neuron, vec![3]);
    assert_eq!(record.ticks_run, 3);

    let json = captured.lock().unwrap().clone().unwrap();
    let parsed: ProvenanceRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, record);
}

proptest! {
    #[test]
    fn prop_pause_exactly_once_per_run(limit in 1u32..40, slots in 1usize..4, extra in 1u32..20) {
        let (mut scheduler, counters) = build(limit, slots);
        let ticks = run_to_pause(&mut scheduler);
        prop_assert_eq!(ticks, (0..limit).collect::<Vec<_>>());
        prop_assert_eq!(scheduler.clock().tick(), limit - 1);
        prop_assert_eq!(counters.ready.load(Ordering::Relaxed), 1);

        // Further events are ignored until resume
        prop_assert_eq!(scheduler.on_timer_event(), TickOutcome::Ignored);

        scheduler.resume(Some((limit + extra, false))).unwrap();
        let ticks = run_to_pause(&mut scheduler);
        prop_assert_eq!(ticks, (limit..limit + extra).collect::<Vec<_>>());
        prop_assert_eq!(counters.ready.load(Ordering::Relaxed), 2);

        let stats = scheduler.background_stats();
        prop_assert_eq!(stats.n_backgrounds_queued, 0);
        prop_assert!(stats.max_backgrounds_queued <= slots as u32);
    }
}
