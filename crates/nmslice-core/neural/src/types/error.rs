// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for synaptic computation

use core::fmt;

/// Errors raised while building or addressing channel state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeuralError {
    /// Neuron ordinal outside the slice
    NeuronOutOfRange { neuron: usize, n_neurons: usize },

    /// Channel ordinal outside the model's channel set
    ChannelOutOfRange { channel: usize, n_channels: usize },

    /// Parameter table does not cover every neuron/channel pair
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Time constant or timestep not strictly positive
    InvalidTimeConstant { tau_ms: f64, timestep_ms: f64 },
}

impl fmt::Display for NeuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeuralError::NeuronOutOfRange { neuron, n_neurons } => {
                write!(f, "Neuron {} out of range (slice has {})", neuron, n_neurons)
            }
            NeuralError::ChannelOutOfRange { channel, n_channels } => {
                write!(f, "Channel {} out of range (model has {})", channel, n_channels)
            }
            NeuralError::ParameterCountMismatch { expected, actual } => {
                write!(
                    f,
                    "Parameter count mismatch: expected {}, got {}",
                    expected, actual
                )
            }
            NeuralError::InvalidTimeConstant { tau_ms, timestep_ms } => {
                write!(
                    f,
                    "Invalid time constant: tau={}ms, timestep={}ms",
                    tau_ms, timestep_ms
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NeuralError {}

pub type Result<T> = core::result::Result<T, NeuralError>;
