//! Configuration loading
//!
//! The file is TOML; every key is optional and falls back to the defaults
//! in `skoled-core`. Validation happens later, at activation.

use std::path::{Path, PathBuf};

use log::info;
use skoled_core::PluginConfig;

/// Configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../skoled.toml");

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse configuration text
pub fn parse(text: &str) -> Result<PluginConfig, ConfigLoadError> {
    Ok(toml::from_str(text)?)
}

/// Load the built-in configuration
pub fn load_default() -> Result<PluginConfig, ConfigLoadError> {
    parse(EMBEDDED_CONFIG)
}

/// Load configuration from a file
pub fn load_from_path(path: &Path) -> Result<PluginConfig, ConfigLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text)?;
    info!(
        "Loaded {} slot(s) from {}",
        config.slots.len(),
        path.display()
    );
    Ok(config)
}
