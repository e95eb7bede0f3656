// TOML config adapter - Configuration files using TOML

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config_initialization::AppConfig;
use crate::domain::errors::*;

/// Locations searched when no `--config` is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["encore.toml", "config/encore.toml"];

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a config document; missing keys keep their defaults
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// First existing default location
    pub fn discover() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }
}
