// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `nmslice.toml`. Every field has a
//! default, so a partial file is valid TOML for this schema.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NmsliceConfig {
    pub simulation: SimulationConfig,
    pub ring_buffer: RingBufferConfig,
    pub scheduler: SchedulerConfig,
    pub synapses: SynapsesConfig,
    pub logging: LoggingConfig,
}

/// Run length and timing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Timer period in microseconds
    pub timer_period_us: u32,
    pub simulation_ticks: u32,
    pub infinite_run: bool,
    /// Simulated time per tick
    pub timestep_ms: f64,
    /// Neurons owned by this core
    pub n_neurons: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timer_period_us: 1000,
            simulation_ticks: 1000,
            infinite_run: false,
            timestep_ms: 1.0,
            n_neurons: 256,
        }
    }
}

/// Ring buffer overflow handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowMode {
    #[default]
    Saturate,
    Wrap,
}

/// Ring buffer field widths
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingBufferConfig {
    pub delay_bits: u32,
    pub neuron_index_bits: u32,
    pub overflow: OverflowMode,
}

impl Default for RingBufferConfig {
    fn default() -> Self {
        Self {
            delay_bits: 4,
            neuron_index_bits: 8,
            overflow: OverflowMode::Saturate,
        }
    }
}

/// Static interrupt/callback priorities (lower value = more urgent)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub timer_priority: i32,
    pub background_priority: i32,
    pub maintenance_priority: i32,
    /// Pending-task slots of the host deferred executor
    pub background_slots: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            timer_priority: 0,
            background_priority: 1,
            maintenance_priority: 2,
            background_slots: 1,
        }
    }
}

/// Synapse channel set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynapseModelKind {
    /// Excitatory + inhibitory
    #[default]
    Exponential,
    /// Excitatory + inhibitory + reward + punishment
    Neuromodulated,
}

impl SynapseModelKind {
    pub fn n_channels(&self) -> usize {
        match self {
            Self::Exponential => 2,
            Self::Neuromodulated => 4,
        }
    }

    /// Bits needed to address every channel
    pub fn type_bits(&self) -> u32 {
        match self {
            Self::Exponential => 1,
            Self::Neuromodulated => 2,
        }
    }
}

/// Synapse shaping parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapsesConfig {
    pub model: SynapseModelKind,
    /// One time constant per channel, in channel order
    pub tau_syn_ms: Vec<f64>,
}

impl Default for SynapsesConfig {
    fn default() -> Self {
        Self {
            model: SynapseModelKind::Exponential,
            tau_syn_ms: vec![5.0, 5.0],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: NmsliceConfig = toml::from_str(
            r#"
            [simulation]
            simulation_ticks = 50

            [ring_buffer]
            overflow = "wrap"

            [synapses]
            model = "neuromodulated"
            tau_syn_ms = [5.0, 5.0, 100.0, 100.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.simulation_ticks, 50);
        assert_eq!(config.simulation.timestep_ms, 1.0);
        assert_eq!(config.ring_buffer.overflow, OverflowMode::Wrap);
        assert_eq!(config.ring_buffer.delay_bits, 4);
        assert_eq!(config.synapses.model.n_channels(), 4);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_model_rejected() {
        let result: Result<NmsliceConfig, _> = toml::from_str(
            r#"
            [synapses]
            model = "izhikevich"
            "#,
        );
        assert!(result.is_err());
    }
}
