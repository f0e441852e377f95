// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse models
//!
//! A synapse model fixes the closed set of receptor channels each neuron has.
//! Channel ordinals index the ring buffer and the shaper; labels and target
//! names are diagnostic only.

/// Kind of receptor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Excitatory,
    Inhibitory,
    Reward,
    Punishment,
}

impl ChannelKind {
    /// Single-character label used in debug dumps
    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Excitatory => "X",
            ChannelKind::Inhibitory => "I",
            ChannelKind::Reward => "R",
            ChannelKind::Punishment => "P",
        }
    }

    /// Projection target name for this channel
    pub fn target(self) -> &'static str {
        match self {
            ChannelKind::Excitatory => "excitatory",
            ChannelKind::Inhibitory => "inhibitory",
            ChannelKind::Reward => "reward",
            ChannelKind::Punishment => "punishment",
        }
    }
}

/// Number of bits needed to encode `count` distinct ordinals
#[inline]
pub const fn bits_for(count: usize) -> u32 {
    if count <= 1 {
        0
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

/// A synapse model: the ordered channel set of a neuron model
pub trait SynapseModel: Send + Sync {
    /// Model name for logging
    fn model_name(&self) -> &'static str;

    /// Channels in ordinal order
    fn channels(&self) -> &'static [ChannelKind];

    /// Number of channels per neuron
    fn n_channels(&self) -> usize {
        self.channels().len()
    }

    /// Bits reserved for the channel ordinal in a ring-buffer index
    fn type_bits(&self) -> u32 {
        bits_for(self.n_channels())
    }

    /// Label for a channel ordinal, `"?"` if the ordinal is not part of the model
    fn channel_label(&self, ordinal: usize) -> &'static str {
        self.channels().get(ordinal).map_or("?", |kind| kind.label())
    }

    /// Channel ordinal for a projection target name
    fn channel_by_target(&self, target: &str) -> Option<usize> {
        self.channels().iter().position(|kind| kind.target() == target)
    }
}

/// Exponential synapses: one excitatory and one inhibitory channel
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialSynapses;

impl SynapseModel for ExponentialSynapses {
    fn model_name(&self) -> &'static str {
        "exponential"
    }

    fn channels(&self) -> &'static [ChannelKind] {
        &[ChannelKind::Excitatory, ChannelKind::Inhibitory]
    }
}

/// Neuromodulated synapses: excitatory, inhibitory, reward and punishment
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuromodulatedSynapses;

impl SynapseModel for NeuromodulatedSynapses {
    fn model_name(&self) -> &'static str {
        "neuromodulated"
    }

    fn channels(&self) -> &'static [ChannelKind] {
        &[
            ChannelKind::Excitatory,
            ChannelKind::Inhibitory,
            ChannelKind::Reward,
            ChannelKind::Punishment,
        ]
    }
}
