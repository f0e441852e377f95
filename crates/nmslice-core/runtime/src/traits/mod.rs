// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Collaborator traits
//!
//! The tick engine drives three collaborators whose internals live elsewhere:
//! - **Neuron**: state update equations, pause/resume, provenance
//! - **Synapse**: synapse resume and structural plasticity, provenance
//! - **Common**: recording, control-plane signalling

pub mod collaborators;

pub use collaborators::{
    CommonCollaborator, NeuronCollaborator, ProvenanceBlock, SynapseCollaborator,
};
