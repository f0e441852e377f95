// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Collaborator traits invoked by the tick engine at fixed lifecycle points

use alloc::vec::Vec;

use nmslice_neural::ChannelShaper;

use crate::error::Result;

/// Opaque provenance words supplied by a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProvenanceBlock(pub Vec<u32>);

impl ProvenanceBlock {
    /// Block from raw words
    pub fn from_words(words: impl Into<Vec<u32>>) -> Self {
        Self(words.into())
    }

    /// Raw words
    pub fn words(&self) -> &[u32] {
        &self.0
    }
}

/// Neuron state update and lifecycle
pub trait NeuronCollaborator: Send {
    /// Stop at a tick boundary
    fn pause(&mut self);

    /// Restore state after a pause; failure aborts the run
    fn resume(&mut self) -> Result<()>;

    /// Advance neuron state by one tick using the shaped synaptic input
    fn do_timestep_update(&mut self, tick: u32, timer_count: u32, inputs: &ChannelShaper);

    /// Provenance for the finalisation record
    fn provenance(&self) -> ProvenanceBlock;
}

/// Synapse lifecycle and structural plasticity
pub trait SynapseCollaborator: Send {
    /// Resume synapse processing from `next_tick`
    fn resume(&mut self, next_tick: u32);

    /// Structural plasticity (synaptogenesis) step for `tick`
    fn do_structural_update(&mut self, tick: u32);

    /// Provenance for the finalisation record
    fn provenance(&self) -> ProvenanceBlock;
}

/// Recording and control-plane services shared by every application
pub trait CommonCollaborator: Send {
    /// Drop inbound events left over from before `tick`
    fn clear_input_buffer(&mut self, _tick: u32) {}

    /// Flush and stop recording at a pause
    fn pause(&mut self);

    /// Reset recording before resuming
    fn reset_recording(&mut self);

    /// Tell the control plane that results can be read
    fn ready_to_read(&mut self);
}
