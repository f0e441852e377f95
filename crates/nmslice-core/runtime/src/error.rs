// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for runtime operations

use core::fmt;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Capacity exceeded
    CapacityExceeded {
        /// Requested capacity
        requested: usize,
        /// Available capacity
        available: usize,
    },

    /// Ring-buffer field widths do not fit an index
    InvalidLayout {
        /// Sum of delay, channel and neuron bits
        total_bits: u32,
        /// Largest supported index width
        max_bits: u32,
    },

    /// An ordinal does not fit its bit field
    OrdinalOutOfRange {
        /// Field name
        field: &'static str,
        /// Offending value
        value: u32,
        /// Exclusive upper bound
        limit: u32,
    },

    /// A collaborator reported failure
    CollaboratorFailed(&'static str),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::CapacityExceeded { requested, available } => {
                write!(
                    f,
                    "Capacity exceeded: requested {}, available {}",
                    requested, available
                )
            }
            RuntimeError::InvalidLayout { total_bits, max_bits } => {
                write!(
                    f,
                    "Invalid ring buffer layout: {} index bits exceeds {}",
                    total_bits, max_bits
                )
            }
            RuntimeError::OrdinalOutOfRange { field, value, limit } => {
                write!(f, "{} {} out of range (limit {})", field, value, limit)
            }
            RuntimeError::CollaboratorFailed(what) => {
                write!(f, "Collaborator failed: {}", what)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuntimeError {}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;
