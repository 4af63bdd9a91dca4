//! Tool configuration
//!
//! Settings are read from an optional TOML file. Missing sections and
//! fields fall back to the built-in defaults.

pub mod settings;

pub use settings::{AnalysisSettings, OutputSettings, SerialSettings, SessionSettings, Settings};

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

/// Built-in settings
pub static DEFAULT_SETTINGS: Lazy<Settings> = Lazy::new(Settings::default);

/// Load settings from `path`, or the built-in defaults when no path is given
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        return Ok(DEFAULT_SETTINGS.clone());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Render the built-in settings as a commented TOML document
pub fn default_toml() -> Result<String, ConfigError> {
    let body = toml::to_string_pretty(&*DEFAULT_SETTINGS)?;
    Ok(format!(
        "# sensor-dump configuration\n# Generated by sensor-dump generate config\n\n{}",
        body
    ))
}
