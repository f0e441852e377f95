// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic computation module
//!
//! Synapse models (which receptor channels exist) and the per-channel shaping
//! pipeline that turns ring-buffer deliveries into a continuous input signal.

pub mod models;
pub mod shaping;

pub use models::*;
pub use shaping::*;
