//! CLI module for encore
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// encore - concert-video archive toolkit
///
/// Thumbnails, trims, MP3 rips, claim muting and resize+concat, driven by
/// ffmpeg, ffprobe and ImageMagick.
#[derive(Parser, Debug)]
#[command(name = "encore")]
#[command(about = "Concert-video archive toolkit")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "ENCORE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub log_format: String,

    /// Configuration file (default: ./encore.toml or ./config/encore.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick the most detailed frames of a video as thumbnails
    Thumbnails(args::ThumbnailsArgs),
    /// Cut a time range out of a video without re-encoding
    Trim(args::TrimArgs),
    /// Rip a stereo MP3 track from a video
    Audio(args::AudioArgs),
    /// Silence claimed time ranges, copying the video stream
    Mute(args::MuteArgs),
    /// Resize every clip in a list to one resolution/framerate and join them
    Concat(args::ConcatArgs),
    /// Check that ffmpeg, ffprobe and ImageMagick are usable
    Doctor(args::DoctorArgs),
}
