// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file
//! 2. Environment variables
//! 3. CLI arguments

use crate::{ConfigError, ConfigResult, NmsliceConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "nmslice.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `NMSLICE_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to five parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NMSLICE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by NMSLICE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet NMSLICE_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is left to [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NmsliceConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NmsliceConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NMSLICE_SIMULATION_TICKS` -> `simulation.simulation_ticks`
/// - `NMSLICE_INFINITE_RUN` -> `simulation.infinite_run`
/// - `NMSLICE_TIMER_PERIOD_US` -> `simulation.timer_period_us`
/// - `NMSLICE_LOG_LEVEL` -> `logging.level`
///
/// Unparseable numeric values are ignored.
pub fn apply_environment_overrides(config: &mut NmsliceConfig) {
    if let Ok(value) = env::var("NMSLICE_SIMULATION_TICKS") {
        if let Ok(ticks) = value.parse::<u32>() {
            config.simulation.simulation_ticks = ticks;
        }
    }
    if let Ok(value) = env::var("NMSLICE_INFINITE_RUN") {
        config.simulation.infinite_run = parse_flag(&value);
    }
    if let Ok(value) = env::var("NMSLICE_TIMER_PERIOD_US") {
        if let Ok(period) = value.parse::<u32>() {
            config.simulation.timer_period_us = period;
        }
    }
    if let Ok(value) = env::var("NMSLICE_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// Keys: `simulation_ticks`, `infinite_run`, `timer_period_us`, `n_neurons`,
/// `background_slots`, `log_level`.
pub fn apply_cli_overrides(config: &mut NmsliceConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("simulation_ticks") {
        if let Ok(ticks) = value.parse::<u32>() {
            config.simulation.simulation_ticks = ticks;
        }
    }
    if let Some(value) = cli_args.get("infinite_run") {
        config.simulation.infinite_run = parse_flag(value);
    }
    if let Some(value) = cli_args.get("timer_period_us") {
        if let Ok(period) = value.parse::<u32>() {
            config.simulation.timer_period_us = period;
        }
    }
    if let Some(value) = cli_args.get("n_neurons") {
        if let Ok(n) = value.parse::<u32>() {
            config.simulation.n_neurons = n;
        }
    }
    if let Some(value) = cli_args.get("background_slots") {
        if let Ok(slots) = value.parse::<usize>() {
            config.scheduler.background_slots = slots;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
