// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Build engine parts from an [`NmsliceConfig`]

use nmslice_config::{validate_config, NmsliceConfig, OverflowMode, SynapseModelKind};
use nmslice_neural::{
    ChannelParams, ChannelShaper, ExponentialSynapses, NeuromodulatedSynapses, OverflowPolicy,
    SynapseModel,
};
use nmslice_runtime::{Priority, RingBuffer, RingBufferLayout};
use nmslice_tick_engine::{Result, TickError, TickSchedulerConfig};
use tracing::debug;

/// Channel set named by the configuration
pub fn synapse_model(config: &NmsliceConfig) -> &'static dyn SynapseModel {
    match config.synapses.model {
        SynapseModelKind::Exponential => &ExponentialSynapses,
        SynapseModelKind::Neuromodulated => &NeuromodulatedSynapses,
    }
}

/// Empty ring buffer sized from `[ring_buffer]` and the synapse model
pub fn ring_buffer(config: &NmsliceConfig) -> Result<RingBuffer> {
    let model = synapse_model(config);
    let layout = RingBufferLayout::new(
        model.type_bits(),
        config.ring_buffer.neuron_index_bits,
        config.ring_buffer.delay_bits,
    )?;
    let overflow = match config.ring_buffer.overflow {
        OverflowMode::Saturate => OverflowPolicy::Saturate,
        OverflowMode::Wrap => OverflowPolicy::Wrap,
    };
    debug!(
        "[RING-BUFFER] {} slots ({} delay, {} type, {} neuron bits), {:?}",
        layout.size(),
        layout.delay_bits(),
        layout.type_bits(),
        layout.neuron_index_bits(),
        overflow
    );
    Ok(RingBuffer::new(layout, overflow))
}

/// Shaper with one decay/init pair per channel, derived from `tau_syn_ms`
pub fn channel_shaper(config: &NmsliceConfig) -> Result<ChannelShaper> {
    let params = config
        .synapses
        .tau_syn_ms
        .iter()
        .map(|&tau| ChannelParams::from_time_constant(tau, config.simulation.timestep_ms))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ChannelShaper::uniform(
        config.simulation.n_neurons as usize,
        &params,
    ))
}

/// Scheduler run parameters from `[simulation]` and `[scheduler]`
pub fn scheduler_config(config: &NmsliceConfig) -> TickSchedulerConfig {
    TickSchedulerConfig {
        simulation_ticks: config.simulation.simulation_ticks,
        infinite_run: config.simulation.infinite_run,
        background_priority: Priority(config.scheduler.background_priority),
    }
}

/// Validate, then build every config-derived part
pub fn engine_parts(
    config: &NmsliceConfig,
) -> Result<(TickSchedulerConfig, RingBuffer, ChannelShaper)> {
    validate_config(config).map_err(|e| TickError::Configuration(e.to_string()))?;
    Ok((
        scheduler_config(config),
        ring_buffer(config)?,
        channel_shaper(config)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parts() {
        let config = NmsliceConfig::default();
        let (sched, ring, shaper) = engine_parts(&config).unwrap();
        assert_eq!(sched.simulation_ticks, 1000);
        assert_eq!(ring.layout().max_neurons(), 256);
        assert_eq!(ring.layout().max_channels(), 2);
        assert_eq!(shaper.n_neurons(), 256);
        assert_eq!(shaper.n_channels(), 2);
    }

    #[test]
    fn test_neuromodulated_uses_two_type_bits() {
        let mut config = NmsliceConfig::default();
        config.synapses.model = SynapseModelKind::Neuromodulated;
        config.synapses.tau_syn_ms = vec![5.0, 5.0, 100.0, 100.0];
        let ring = ring_buffer(&config).unwrap();
        assert_eq!(ring.layout().type_bits(), 2);
        assert_eq!(synapse_model(&config).channel_label(2), "R");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = NmsliceConfig::default();
        config.scheduler.background_priority = -5;
        assert!(matches!(
            engine_parts(&config),
            Err(TickError::Configuration(_))
        ));
    }
}
