// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connectivity error types

/// Result type for connection generation
pub type Result<T> = std::result::Result<T, ConnectivityError>;

/// Errors raised while decoding parameters or generating connections
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectivityError {
    /// The sink is full; the pass must be aborted
    #[error("Matrix not sized correctly: sink capacity {capacity} exhausted")]
    SinkFull { capacity: usize },

    #[error("Parameter region exhausted: need {needed} bytes, {remaining} remaining")]
    ParameterRegionExhausted { needed: usize, remaining: usize },

    #[error("Unknown connector id: {0}")]
    UnknownConnector(u32),

    #[error("Unknown value source id: {0}")]
    UnknownValueSource(u32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown or freed connector handle: {0}")]
    UnknownHandle(usize),
}
