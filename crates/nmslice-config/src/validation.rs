// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that field widths fit the ring buffer index, priorities are
//! ordered, and synapse parameters match the chosen model.

use crate::{ConfigError, ConfigResult, NmsliceConfig};

/// Widest ring buffer index (delay + type + neuron bits)
pub const MAX_INDEX_BITS: u32 = 28;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    IndexTooWide { total_bits: u32 },
    NeuronsExceedIndex { n_neurons: u32, neuron_index_bits: u32 },
    PriorityOrder { timer: i32, background: i32, maintenance: i32 },
    ChannelCountMismatch { model: String, expected: usize, actual: usize },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexTooWide { total_bits } => write!(
                f,
                "ring buffer index needs {} bits, at most {} allowed",
                total_bits, MAX_INDEX_BITS
            ),
            Self::NeuronsExceedIndex {
                n_neurons,
                neuron_index_bits,
            } => write!(
                f,
                "simulation.n_neurons = {} does not fit ring_buffer.neuron_index_bits = {}",
                n_neurons, neuron_index_bits
            ),
            Self::PriorityOrder {
                timer,
                background,
                maintenance,
            } => write!(
                f,
                "scheduler priorities must satisfy timer < background < maintenance (got {} / {} / {})",
                timer, background, maintenance
            ),
            Self::ChannelCountMismatch {
                model,
                expected,
                actual,
            } => write!(
                f,
                "synapses.tau_syn_ms has {} entries, model {} needs {}",
                actual, model, expected
            ),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &NmsliceConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_ring_buffer(config, &mut errors);
    validate_priorities(config, &mut errors);
    validate_simulation(config, &mut errors);
    validate_synapses(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_ring_buffer(config: &NmsliceConfig, errors: &mut Vec<ConfigValidationError>) {
    let rb = &config.ring_buffer;
    let total_bits = rb.delay_bits + config.synapses.model.type_bits() + rb.neuron_index_bits;
    if total_bits > MAX_INDEX_BITS {
        errors.push(ConfigValidationError::IndexTooWide { total_bits });
    } else if u64::from(config.simulation.n_neurons) > 1u64 << rb.neuron_index_bits {
        errors.push(ConfigValidationError::NeuronsExceedIndex {
            n_neurons: config.simulation.n_neurons,
            neuron_index_bits: rb.neuron_index_bits,
        });
    }
    if rb.delay_bits == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "ring_buffer.delay_bits".to_string(),
            reason: "at least one delay bit is required".to_string(),
        });
    }
}

fn validate_priorities(config: &NmsliceConfig, errors: &mut Vec<ConfigValidationError>) {
    let s = &config.scheduler;
    if !(s.timer_priority < s.background_priority && s.background_priority < s.maintenance_priority)
    {
        errors.push(ConfigValidationError::PriorityOrder {
            timer: s.timer_priority,
            background: s.background_priority,
            maintenance: s.maintenance_priority,
        });
    }
    if s.background_slots == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "scheduler.background_slots".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
}

fn validate_simulation(config: &NmsliceConfig, errors: &mut Vec<ConfigValidationError>) {
    let sim = &config.simulation;
    if !(sim.timestep_ms > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.timestep_ms".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if sim.timer_period_us == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "simulation.timer_period_us".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_synapses(config: &NmsliceConfig, errors: &mut Vec<ConfigValidationError>) {
    let syn = &config.synapses;
    let expected = syn.model.n_channels();
    if syn.tau_syn_ms.len() != expected {
        errors.push(ConfigValidationError::ChannelCountMismatch {
            model: format!("{:?}", syn.model).to_lowercase(),
            expected,
            actual: syn.tau_syn_ms.len(),
        });
    }
    for (channel, tau) in syn.tau_syn_ms.iter().enumerate() {
        if !(*tau > 0.0) {
            errors.push(ConfigValidationError::InvalidValue {
                field: format!("synapses.tau_syn_ms[{}]", channel),
                reason: "time constants must be positive".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SynapseModelKind;

    #[test]
    fn test_index_too_wide() {
        let mut config = NmsliceConfig::default();
        config.ring_buffer.delay_bits = 10;
        config.ring_buffer.neuron_index_bits = 18;

        let result = validate_config(&config);
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("29 bits"));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_neurons_exceed_index() {
        let mut config = NmsliceConfig::default();
        config.simulation.n_neurons = 257;

        let result = validate_config(&config);
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("n_neurons = 257"));
        }
    }

    #[test]
    fn test_priority_order() {
        let mut config = NmsliceConfig::default();
        config.scheduler.background_priority = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("timer < background < maintenance"));
        }
    }

    #[test]
    fn test_channel_count_follows_model() {
        let mut config = NmsliceConfig::default();
        config.synapses.model = SynapseModelKind::Neuromodulated;

        let result = validate_config(&config);
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("neuromodulated needs 4"));
        }

        config.synapses.tau_syn_ms = vec![5.0, 5.0, 100.0, 100.0];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_non_positive_values() {
        let mut config = NmsliceConfig::default();
        config.simulation.timestep_ms = 0.0;
        config.synapses.tau_syn_ms = vec![5.0, f64::NAN];

        let result = validate_config(&config);
        if let Err(ConfigError::ValidationError(msg)) = result {
            assert!(msg.contains("simulation.timestep_ms"));
            assert!(msg.contains("tau_syn_ms[1]"));
        } else {
            panic!("expected validation error");
        }
    }
}
