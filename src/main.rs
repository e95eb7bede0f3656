//! encore - concert-video archive toolkit
//!
//! Drives ffmpeg, ffprobe and ImageMagick to produce the artifacts a
//! concert-video archive needs.
//!
//! # Features
//!
//! - Detail-ranked thumbnails sampled across the whole video
//! - Lossless trims and stereo MP3 rips
//! - Audio muting of claimed ranges with the video stream copied
//! - Resize and framerate normalization before concatenation
//!
//! # Usage
//!
//! ```bash
//! encore thumbnails concert.mp4 --samples 250 --keep 50
//! encore trim -i concert.mp4 -o encore.mp4 --start 01:02:00 --stop 01:09:30
//! encore mute -i concert.mp4 -o muted.mp4 --range 65-80 --range 300-312.5
//! encore concat clips.txt --resolution 1080p --framerate 60
//! encore doctor
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use encore_cli::cli::{commands, Cli, Commands};
use encore_cli::config_initialization::initialize_configuration;
use encore_cli::utils::logging::{LogFormat, LogLevel, LoggingConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = initialize_configuration(&cli)?;

    let logging = LoggingConfig {
        level: LogLevel::parse(&config.log_level)?,
        format: LogFormat::parse(&cli.log_format)?,
    };
    LoggingSystem::new(logging)
        .initialize()
        .context("Failed to initialize logging")?;

    info!("Starting encore {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Thumbnails(args) => commands::thumbnails(args, &config).await?,
        Commands::Trim(args) => commands::trim(args, &config).await?,
        Commands::Audio(args) => commands::audio(args, &config).await?,
        Commands::Mute(args) => commands::mute(args, &config).await?,
        Commands::Concat(args) => commands::concat(args, &config).await?,
        Commands::Doctor(args) => commands::doctor(args, &config).await?,
    }

    Ok(())
}
