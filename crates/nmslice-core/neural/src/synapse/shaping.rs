// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Synapse Channel Shaping
//!
//! First-order exponential decay of synaptic input, discretised at the
//! simulation step:
//!
//! ```text
//! Per tick, per channel:
//!     value ← value × decay                      (shape)
//!     value ← value + delivered × init           (once per ring-buffer delivery)
//!
//! With time constant τ and timestep Δt:
//!     decay = exp(-Δt / τ)
//!     init  = (τ / Δt) × (1 - decay)
//! ```
//!
//! Channels never interact: each accumulates and decays independently.

use alloc::vec::Vec;

use crate::types::{decay_mul, Accum, Decay, NeuralError, Result};

/// Per-channel decay and delivery-scaling factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    pub decay: Decay,
    pub init: Decay,
}

impl ChannelParams {
    pub fn new(decay: Decay, init: Decay) -> Self {
        Self { decay, init }
    }

    /// Derive decay and init from a synaptic time constant
    ///
    /// # Example
    /// ```
    /// use nmslice_neural::ChannelParams;
    ///
    /// let params = ChannelParams::from_time_constant(5.0, 1.0).unwrap();
    /// let decay: f64 = params.decay.to_num();
    /// assert!((decay - (-0.2f64).exp()).abs() < 1e-6);
    /// ```
    #[cfg(feature = "std")]
    pub fn from_time_constant(tau_ms: f64, timestep_ms: f64) -> Result<Self> {
        if !(tau_ms > 0.0 && timestep_ms > 0.0) {
            return Err(NeuralError::InvalidTimeConstant { tau_ms, timestep_ms });
        }
        let decay = (-timestep_ms / tau_ms).exp();
        let init = (tau_ms / timestep_ms) * (1.0 - decay);
        Ok(Self {
            decay: Decay::saturating_from_num(decay),
            init: Decay::saturating_from_num(init),
        })
    }
}

/// Shaped input of one channel of one neuron
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseChannelState {
    pub value: Accum,
    pub decay: Decay,
    pub init: Decay,
}

impl SynapseChannelState {
    pub fn new(params: ChannelParams) -> Self {
        Self {
            value: Accum::ZERO,
            decay: params.decay,
            init: params.init,
        }
    }

    /// Pure decay, no new input
    #[inline]
    pub fn shape(&mut self) {
        self.value = decay_mul(self.value, self.decay);
    }

    /// Accumulate one delivery scaled by the init factor
    #[inline]
    pub fn add_input(&mut self, delivered: Accum) {
        self.value = self.value.saturating_add(decay_mul(delivered, self.init));
    }
}

/// Channel state for every neuron in the slice
///
/// Layout is neuron-major: the channels of neuron `n` occupy
/// `states[n * n_channels .. (n + 1) * n_channels]`.
#[derive(Debug, Clone)]
pub struct ChannelShaper {
    n_neurons: usize,
    n_channels: usize,
    states: Vec<SynapseChannelState>,
}

impl ChannelShaper {
    /// Same per-channel parameters for every neuron
    pub fn uniform(n_neurons: usize, per_channel: &[ChannelParams]) -> Self {
        let n_channels = per_channel.len();
        let mut states = Vec::with_capacity(n_neurons * n_channels);
        for _ in 0..n_neurons {
            states.extend(per_channel.iter().copied().map(SynapseChannelState::new));
        }
        Self {
            n_neurons,
            n_channels,
            states,
        }
    }

    /// Individual parameters per neuron/channel, neuron-major
    pub fn from_params(
        n_neurons: usize,
        n_channels: usize,
        params: &[ChannelParams],
    ) -> Result<Self> {
        let expected = n_neurons * n_channels;
        if params.len() != expected {
            return Err(NeuralError::ParameterCountMismatch {
                expected,
                actual: params.len(),
            });
        }
        Ok(Self {
            n_neurons,
            n_channels,
            states: params.iter().copied().map(SynapseChannelState::new).collect(),
        })
    }

    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Decay every channel of every neuron by one step
    pub fn shape_all(&mut self) {
        for state in &mut self.states {
            state.shape();
        }
    }

    /// Feed one ring-buffer delivery into a channel
    ///
    /// Callers on the tick path iterate within bounds; out-of-range ordinals
    /// are a programming error and panic.
    #[inline]
    pub fn add_input(&mut self, neuron: usize, channel: usize, delivered: Accum) {
        let idx = neuron * self.n_channels + channel;
        self.states[idx].add_input(delivered);
    }

    /// Current shaped value, checked
    pub fn value(&self, neuron: usize, channel: usize) -> Result<Accum> {
        self.check(neuron, channel)?;
        Ok(self.states[neuron * self.n_channels + channel].value)
    }

    /// All channels of one neuron (read-only view for the neuron update)
    pub fn neuron_inputs(&self, neuron: usize) -> Result<&[SynapseChannelState]> {
        self.check(neuron, 0)?;
        let start = neuron * self.n_channels;
        Ok(&self.states[start..start + self.n_channels])
    }

    /// Overwrite a channel's shaped value (state restore after reset)
    pub fn set_value(&mut self, neuron: usize, channel: usize, value: Accum) -> Result<()> {
        self.check(neuron, channel)?;
        self.states[neuron * self.n_channels + channel].value = value;
        Ok(())
    }

    fn check(&self, neuron: usize, channel: usize) -> Result<()> {
        if neuron >= self.n_neurons {
            return Err(NeuralError::NeuronOutOfRange {
                neuron,
                n_neurons: self.n_neurons,
            });
        }
        if channel >= self.n_channels {
            return Err(NeuralError::ChannelOutOfRange {
                channel,
                n_channels: self.n_channels,
            });
        }
        Ok(())
    }
}
