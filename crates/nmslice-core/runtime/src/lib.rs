// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Slice Runtime Primitives
//!
//! Building blocks the tick engine runs on:
//! - **Ring buffer**: delay-line storage of pending synaptic input, addressed
//!   by a packed (tick, channel, neuron) index
//! - **Interrupts**: platform masking trait and a scoped critical-section guard
//! - **Background**: deferred-execution trait and the admission tracker that
//!   accounts for queued and rejected background work
//! - **Traits**: the neuron, synapse and common collaborators driven per tick
//!
//! Everything here is `no_std` + `alloc` compatible.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod background;
pub mod error;
pub mod interrupts;
pub mod ring_buffer;
pub mod traits;

pub use background::{
    Admission, BackgroundQueueStats, BackgroundTask, BackgroundTracker, DeferredExecutor,
    Priority, SlotQueue,
};
pub use error::{Result, RuntimeError};
pub use interrupts::{CriticalSection, HostInterrupts, InterruptControl, InterruptMask};
pub use ring_buffer::{ring_buffer_index, RingBuffer, RingBufferLayout, MAX_RING_BUFFER_BITS};
pub use traits::{CommonCollaborator, NeuronCollaborator, ProvenanceBlock, SynapseCollaborator};
