// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # nmslice-observability
//!
//! Console logging for nmslice tools with per-crate debug flags
//! (`--debug-<crate>`, `--debug-all`, `NMSLICE_DEBUG`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Crate names accepted by the debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "nmslice-neural",
    "nmslice-runtime",
    "nmslice-tick-engine",
    "nmslice-connectivity",
    "nmslice-config",
];
