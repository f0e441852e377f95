// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Slice Neural Computation (Platform-Agnostic)
//!
//! Synaptic computation for one simulation core:
//! - **Types**: fixed-point accumulators and decay factors, error types
//! - **Synapse models**: the closed set of receptor channels per neuron model
//! - **Shaping**: per-neuron, per-channel exponential decay of synaptic input
//!
//! ## Target Platforms
//! - ✅ Desktop (Linux, macOS, Windows)
//! - ✅ Embedded (ARM Cortex-M, many-core neuromorphic boards)

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod synapse;
pub mod types;

pub use synapse::{
    ChannelKind, ChannelParams, ChannelShaper, ExponentialSynapses, NeuromodulatedSynapses,
    SynapseChannelState, SynapseModel,
};
pub use types::{decay_mul, Accum, Decay, NeuralError, OverflowPolicy, Result};
