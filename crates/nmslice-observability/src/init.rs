// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialisation

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Install a console subscriber
///
/// `default_level` applies to every crate not raised by `debug_flags`
/// (e.g. the `[logging] level` config value).
///
/// # Errors
///
/// Fails on an unparseable filter or when a global subscriber is already set.
pub fn init_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<()> {
    let filter = debug_flags.to_filter_string(&default_level.to_lowercase());
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter);

    Registry::default()
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialised with filter '{}'", filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only test in this binary that installs a global subscriber
    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-nmslice-runtime".to_string()]);
        init_logging(&flags, "INFO").unwrap();
        assert!(init_logging(&flags, "info").is_err());
    }
}
