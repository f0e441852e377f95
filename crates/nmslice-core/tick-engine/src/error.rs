// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the tick engine

use nmslice_neural::NeuralError;
use nmslice_runtime::RuntimeError;

use crate::scheduler::SchedulerState;

/// Result type for tick engine operations
pub type Result<T> = std::result::Result<T, TickError>;

/// Errors that stop the run or reject a lifecycle request
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Resume hook failed; the run cannot continue
    #[error("Resume failed: {0}")]
    ResumeFailed(#[source] RuntimeError),

    #[error("Cannot {action} while {state:?}")]
    InvalidTransition {
        state: SchedulerState,
        action: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Provenance already written")]
    AlreadyFinalized,

    #[error("Failed to write provenance: {0}")]
    ProvenanceWrite(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Neural(#[from] NeuralError),
}
