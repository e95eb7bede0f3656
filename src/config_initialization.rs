//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::cli::Cli;
use crate::domain::errors::DomainError;
use crate::utils::logging::LogLevel;

/// External program names or paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub magick: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            magick: "magick".to_string(),
        }
    }
}

/// Thumbnail command defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailSettings {
    pub samples: usize,
    pub keep: usize,
    /// Top selections copied next to the source video
    pub promote: usize,
    /// Extension the extractor writes
    pub frame_format: String,
    /// Extension the converter produces and ranking measures
    pub ranked_format: String,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            samples: 250,
            keep: 50,
            promote: 3,
            frame_format: "bmp".to_string(),
            ranked_format: "jpg".to_string(),
        }
    }
}

/// Audio extraction defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub bitrate: String,
    pub sample_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            bitrate: "320k".to_string(),
            sample_rate: 48000,
        }
    }
}

/// Resize encoder defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeSettings {
    pub video_encoder: String,
    pub quality: u32,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            video_encoder: "hevc_nvenc".to_string(),
            quality: 24,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub tools: ToolPaths,
    pub thumbnails: ThumbnailSettings,
    pub audio: AudioSettings,
    pub transcode: TranscodeSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tools: ToolPaths::default(),
            thumbnails: ThumbnailSettings::default(),
            audio: AudioSettings::default(),
            transcode: TranscodeSettings::default(),
        }
    }
}

impl AppConfig {
    /// Reject values no command can work with
    pub fn validate(&self) -> Result<(), DomainError> {
        LogLevel::parse(&self.log_level)?;
        if self.thumbnails.samples == 0 || self.thumbnails.keep == 0 {
            return Err(DomainError::Config(
                "thumbnails.samples and thumbnails.keep must be at least 1".to_string(),
            ));
        }
        if self.thumbnails.frame_format == self.thumbnails.ranked_format {
            return Err(DomainError::Config(
                "thumbnails.frame_format and thumbnails.ranked_format must differ".to_string(),
            ));
        }
        for (key, value) in [
            ("tools.ffmpeg", &self.tools.ffmpeg),
            ("tools.ffprobe", &self.tools.ffprobe),
            ("tools.magick", &self.tools.magick),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Config(format!("{} cannot be empty", key)));
            }
        }
        Ok(())
    }
}

/// Environment variables and the settings they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("ENCORE_FFMPEG", "tools.ffmpeg"),
    ("ENCORE_FFPROBE", "tools.ffprobe"),
    ("ENCORE_MAGICK", "tools.magick"),
    ("ENCORE_LOG_LEVEL", "log_level"),
];

/// Apply environment overrides using `lookup` to read variables
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for &(env_var, key) in ENV_MAPPINGS {
        let Some(value) = lookup(env_var) else {
            continue;
        };
        info!("Found environment override: {} = {}", env_var, value);
        match key {
            "tools.ffmpeg" => config.tools.ffmpeg = value,
            "tools.ffprobe" => config.tools.ffprobe = value,
            "tools.magick" => config.tools.magick = value,
            "log_level" => config.log_level = value,
            _ => continue,
        }
        env_overrides += 1;
    }
    env_overrides
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => TomlConfigAdapter::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match TomlConfigAdapter::discover() {
            Some(path) => TomlConfigAdapter::load(&path)?,
            None => {
                info!("No config file found, using defaults");
                AppConfig::default()
            }
        },
    };

    let env_overrides = apply_environment_overrides(&mut config, |name| std::env::var(name).ok());
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
