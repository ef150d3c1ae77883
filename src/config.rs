// src/config.rs

//! Configuration loading utilities.
//!
//! A config file holds one or more named modes. A single-mode file needs no
//! `--mode` flag; a multi-mode file requires one. Unlike transient faults,
//! a bad config is fatal: the watcher refuses to start rather than poll
//! with defaults it was never given.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{ConfigFile, WatchConfig};

/// Load a watch config from a TOML file, resolving the mode.
///
/// Returns the selected config and the resolved mode name.
pub fn load_watch_config(path: &Path, mode: Option<&str>) -> Result<(WatchConfig, String)> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("cannot read config {:?}: {}", path, e)))?;
    let file: ConfigFile = toml::from_str(&content)?;

    let mode = resolve_mode(&file, mode, path)?;
    let config = file
        .get(&mode)
        .cloned()
        .ok_or_else(|| AppError::config(format!("mode '{}' not found in {:?}", mode, path)))?;

    config.validate()?;
    Ok((config, mode))
}

fn resolve_mode(file: &ConfigFile, mode: Option<&str>, path: &Path) -> Result<String> {
    if let Some(mode) = mode {
        return Ok(mode.to_string());
    }

    let mut modes = file.keys();
    match (modes.next(), modes.next()) {
        (Some(only), None) => Ok(only.clone()),
        (None, _) => Err(AppError::config(format!("config {:?} defines no modes", path))),
        (Some(_), Some(_)) => Err(AppError::config(format!(
            "config {:?} defines multiple modes ({}); pass --mode",
            path,
            file.keys().cloned().collect::<Vec<_>>().join(", "),
        ))),
    }
}
