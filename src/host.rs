// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side collaborators for running a core off-target
//!
//! A leaky integrate-and-fire neuron, static synapses and a recorder, enough
//! to drive the tick engine end to end in tools and tests.

use std::sync::{Arc, Mutex};

use nmslice_neural::ChannelShaper;
use nmslice_runtime::{
    CommonCollaborator, NeuronCollaborator, ProvenanceBlock, RuntimeError, SynapseCollaborator,
};
use tracing::{debug, trace};

/// One emitted spike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spike {
    pub tick: u32,
    pub neuron: u32,
}

/// Spikes shared between the neuron collaborator and the host loop
pub type SpikeLog = Arc<Mutex<Vec<Spike>>>;

/// Leaky integrate-and-fire population
///
/// `v <- v * leak + excitatory - inhibitory`; a spike resets `v` to zero.
pub struct LeakyIntegrator {
    membrane: Vec<f64>,
    leak: f64,
    threshold: f64,
    spikes: SpikeLog,
    saved: Option<Vec<f64>>,
    n_spikes: u32,
    n_updates: u32,
}

impl LeakyIntegrator {
    pub fn new(n_neurons: usize, leak: f64, threshold: f64, spikes: SpikeLog) -> Self {
        Self {
            membrane: vec![0.0; n_neurons],
            leak,
            threshold,
            spikes,
            saved: None,
            n_spikes: 0,
            n_updates: 0,
        }
    }
}

impl NeuronCollaborator for LeakyIntegrator {
    fn pause(&mut self) {
        self.saved = Some(self.membrane.clone());
    }

    fn resume(&mut self) -> Result<(), RuntimeError> {
        let saved = self
            .saved
            .take()
            .ok_or(RuntimeError::CollaboratorFailed("no saved neuron state"))?;
        self.membrane = saved;
        Ok(())
    }

    fn do_timestep_update(&mut self, tick: u32, _timer_count: u32, inputs: &ChannelShaper) {
        self.n_updates += 1;
        let mut fired = Vec::new();
        for (neuron, v) in self.membrane.iter_mut().enumerate() {
            let Ok(channels) = inputs.neuron_inputs(neuron) else {
                break;
            };
            let excitatory: f64 = channels.first().map_or(0.0, |c| c.value.to_num());
            let inhibitory: f64 = channels.get(1).map_or(0.0, |c| c.value.to_num());
            *v = *v * self.leak + excitatory - inhibitory;
            if *v >= self.threshold {
                *v = 0.0;
                fired.push(Spike {
                    tick,
                    neuron: neuron as u32,
                });
            }
        }
        if !fired.is_empty() {
            trace!("Tick {}: {} spikes", tick, fired.len());
            self.n_spikes += fired.len() as u32;
            if let Ok(mut log) = self.spikes.lock() {
                log.extend(fired);
            }
        }
    }

    fn provenance(&self) -> ProvenanceBlock {
        ProvenanceBlock::from_words(vec![self.n_spikes, self.n_updates])
    }
}

/// Synapses without plasticity; counts structural update calls
#[derive(Debug, Default)]
pub struct StaticSynapses {
    structural_updates: u32,
    resumed_at: Option<u32>,
}

impl StaticSynapses {
    pub fn resumed_at(&self) -> Option<u32> {
        self.resumed_at
    }
}

impl SynapseCollaborator for StaticSynapses {
    fn resume(&mut self, next_tick: u32) {
        self.resumed_at = Some(next_tick);
    }

    fn do_structural_update(&mut self, _tick: u32) {
        self.structural_updates += 1;
    }

    fn provenance(&self) -> ProvenanceBlock {
        ProvenanceBlock::from_words(vec![self.structural_updates])
    }
}

/// Counters observed by the host control plane
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecorderStats {
    pub pauses: u32,
    pub recording_resets: u32,
    pub ready_signals: u32,
}

/// Recording/control-plane stand-in
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    stats: Arc<Mutex<RecorderStats>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the counters
    pub fn stats(&self) -> RecorderStats {
        self.stats.lock().map(|s| *s).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut RecorderStats)) {
        if let Ok(mut stats) = self.stats.lock() {
            f(&mut stats);
        }
    }
}

impl CommonCollaborator for Recorder {
    fn pause(&mut self) {
        self.update(|s| s.pauses += 1);
    }

    fn reset_recording(&mut self) {
        self.update(|s| s.recording_resets += 1);
    }

    fn ready_to_read(&mut self) {
        self.update(|s| s.ready_signals += 1);
        debug!("Results ready to read");
    }
}

/// Route recorded spikes through generated connections onto `channel`
///
/// Each connection from a spiking neuron schedules its weight `delay` ticks
/// after the current tick. Returns the number of deliveries.
#[cfg(feature = "connectivity")]
pub fn deliver_spikes<I, D>(
    scheduler: &mut nmslice_tick_engine::TickScheduler<I, D>,
    connections: &[nmslice_connectivity::ConnectionRecord],
    spikes: &[Spike],
    channel: u32,
) -> nmslice_tick_engine::Result<usize>
where
    I: nmslice_runtime::InterruptControl,
    D: nmslice_runtime::DeferredExecutor,
{
    let mut delivered = 0;
    for spike in spikes {
        for record in connections.iter().filter(|r| r.pre == spike.neuron) {
            scheduler.deliver(u32::from(record.delay), channel, record.post, record.weight)?;
            delivered += 1;
        }
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmslice_neural::{Accum, ChannelParams, Decay};

    #[test]
    fn test_integrator_fires_and_resets() {
        let spikes = SpikeLog::default();
        let mut neuron = LeakyIntegrator::new(2, 0.5, 1.0, spikes.clone());
        let params = ChannelParams::new(Decay::ZERO, Decay::ZERO);
        let mut shaper = ChannelShaper::uniform(2, &[params, params]);
        shaper.set_value(1, 0, Accum::from_num(1.5)).unwrap();

        neuron.do_timestep_update(3, 3, &shaper);

        assert_eq!(*spikes.lock().unwrap(), vec![Spike { tick: 3, neuron: 1 }]);
        assert_eq!(neuron.provenance().words(), &[1, 1]);
    }

    #[test]
    fn test_resume_requires_saved_state() {
        let mut neuron = LeakyIntegrator::new(1, 0.5, 1.0, SpikeLog::default());
        assert!(neuron.resume().is_err());
        neuron.pause();
        assert!(neuron.resume().is_ok());
    }
}
