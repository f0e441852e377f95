// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nmslice - per-core execution engine for a spiking network slice
//!
//! One simulation core owns a contiguous slice of a neuron population. This
//! crate wires together the pieces that run it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Initialisation: nmslice-connectivity                   │
//! │  (connection generators, value sources, matrix sinks)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Per tick: nmslice-tick-engine                          │
//! │  (clock, ring-buffer drain, shaping, background admit)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Primitives: nmslice-runtime, nmslice-neural (no_std)   │
//! │  (ring buffer, critical sections, fixed-point shaping)  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Feature Flags
//! - **`platform-std`** (default): std error impls in the `no_std` crates
//! - **`connectivity`** (default): connection generation
//! - **`config`** (default): TOML configuration and [`setup`] helpers
//! - **`observability`** (default): logging initialisation
//!
//! ## License
//!
//! Apache-2.0

pub use nmslice_neural as neural;
pub use nmslice_runtime as runtime;
pub use nmslice_tick_engine as tick_engine;

#[cfg(feature = "connectivity")]
pub use nmslice_connectivity as connectivity;

#[cfg(feature = "config")]
pub use nmslice_config as config;

#[cfg(feature = "observability")]
pub use nmslice_observability as observability;

pub mod host;

#[cfg(feature = "config")]
pub mod setup;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::neural::{Accum, ChannelParams, ChannelShaper, Decay, OverflowPolicy, SynapseModel};
    pub use crate::runtime::{
        BackgroundTask, CommonCollaborator, DeferredExecutor, HostInterrupts, NeuronCollaborator,
        Priority, ProvenanceBlock, RingBuffer, RingBufferLayout, SlotQueue, SynapseCollaborator,
    };
    pub use crate::tick_engine::{
        Collaborators, ProvenanceRecord, SchedulerState, TickOutcome, TickScheduler,
        TickSchedulerConfig,
    };

    #[cfg(feature = "connectivity")]
    pub use crate::connectivity::{
        BoundedMatrix, ConnectionGenerator, ConnectionRecord, GenerateRequest, GenerationPass,
        MatrixSink, ParamCursor,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, validate_config, NmsliceConfig};
}
