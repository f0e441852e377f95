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

//! # Slice Tick Engine
//!
//! Real-time execution of one simulation core.
//!
//! ## Per timer event
//! 1. Mask every interrupt, advance the clock, clear stale inbound events
//! 2. Mask IRQs, drain the ring buffer into the channel shaper
//! 3. At the tick limit: pause (clock rolled back by one) and signal the host
//! 4. Otherwise: offer the neuron update to the background executor
//!
//! The time-critical path runs synchronously inside the timer handler;
//! everything else is deferred and may be dropped under overload.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod error;
pub mod provenance;
pub mod scheduler;
pub mod time_critical;

pub use clock::SimulationClock;
pub use error::{Result, TickError};
pub use provenance::{JsonProvenanceWriter, ProvenanceRecord, ProvenanceSink};
pub use scheduler::{
    default_resume_hook, Collaborators, ResumeHook, SchedulerState, TickOutcome, TickScheduler,
    TickSchedulerConfig,
};
pub use time_critical::process_ring_buffers;
