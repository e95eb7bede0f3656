//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::domain::model::MuteRange;

fn at_least_one(s: &str) -> Result<usize, String> {
    number_range(s, 1, usize::MAX)
}

fn framerate(s: &str) -> Result<u32, String> {
    number_range(s, 1, 480)
}

fn mute_range(s: &str) -> Result<MuteRange, String> {
    s.parse::<MuteRange>().map_err(|e| e.to_string())
}

/// Arguments for the thumbnails command
#[derive(Args, Debug)]
pub struct ThumbnailsArgs {
    /// Input video file path
    pub video: PathBuf,

    /// Output directory (default: a thumbnails folder next to the video)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Frames to sample (default from config: 250)
    #[arg(short, long, value_parser = at_least_one)]
    pub samples: Option<usize>,

    /// Top-ranked frames to keep; set equal to samples to keep them all (default from config: 50)
    #[arg(short, long, value_parser = at_least_one)]
    pub keep: Option<usize>,

    /// Top thumbnails also copied next to the video (default from config: 3)
    #[arg(long)]
    pub promote: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Start time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(long)]
    pub start: Option<String>,

    /// Stop time (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(long)]
    pub stop: Option<String>,
}

/// Arguments for the audio command
#[derive(Args, Debug)]
pub struct AudioArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output MP3 path (default: input with .mp3 extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bitrate, e.g. 320k (default from config)
    #[arg(long)]
    pub bitrate: Option<String>,

    /// Sampling frequency in Hz (default from config: 48000)
    #[arg(long)]
    pub sample_rate: Option<u32>,
}

/// Arguments for the mute command
#[derive(Args, Debug)]
pub struct MuteArgs {
    /// Input video file path
    #[arg(short, long, required_unless_present = "print_filter")]
    pub input: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, required_unless_present = "print_filter")]
    pub output: Option<PathBuf>,

    /// Range to silence as START-STOP; repeat for more ranges
    #[arg(long = "range", required = true, value_parser = mute_range)]
    pub ranges: Vec<MuteRange>,

    /// Only print the ffmpeg audio filter
    #[arg(long)]
    pub print_filter: bool,
}

/// Arguments for the concat command
#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// List file with one `file '<path>'` line per clip
    pub list: PathBuf,

    /// Target resolution (720p, 1080p, 2k, 4k)
    #[arg(long, default_value = "4k")]
    pub resolution: String,

    /// Target framerate
    #[arg(long, default_value = "60", value_parser = framerate)]
    pub framerate: u32,

    /// Output file path (default: concatenated.<ext> next to the first clip)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Only print the plan
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the doctor command
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
