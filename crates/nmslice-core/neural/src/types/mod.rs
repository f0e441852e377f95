// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions shared by every slice crate

pub mod error;
pub mod fixed_point;

pub use error::{NeuralError, Result};
pub use fixed_point::{decay_mul, Accum, Decay, OverflowPolicy};
