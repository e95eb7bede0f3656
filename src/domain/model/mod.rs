// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Create a new TimeSpec from hours, minutes, seconds, milliseconds
    pub fn from_components(hours: u32, minutes: u32, seconds: u32, milliseconds: u32) -> Self {
        let total_seconds = hours as f64 * 3600.0
            + minutes as f64 * 60.0
            + seconds as f64
            + milliseconds as f64 / 1000.0;
        Self {
            seconds: total_seconds,
        }
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();
        let invalid = || DomainError::InvalidTimeFormat(trimmed.to_string());

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if seconds < 0.0 || !seconds.is_finite() {
                return Err(invalid());
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
                let seconds = parse_seconds_field(seconds).ok_or_else(invalid)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = hours.parse::<u32>().map_err(|_| invalid())?;
                let minutes = minutes.parse::<u32>().map_err(|_| invalid())?;
                let seconds = parse_seconds_field(seconds).ok_or_else(invalid)?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis / 60_000) % 60;
        let seconds = (total_millis / 1000) % 60;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// Seconds as passed on an ffmpeg command line
    pub fn to_ffmpeg_arg(&self) -> String {
        format!("{:.3}", self.seconds)
    }
}

fn parse_seconds_field(field: &str) -> Option<f64> {
    let seconds = field.parse::<f64>().ok()?;
    if (0.0..60.0).contains(&seconds) {
        Some(seconds)
    } else {
        None
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// A timeline offset selected for frame extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 0-based position in the sampling schedule
    pub index: usize,
    /// Offset into the source, in seconds
    pub offset: f64,
}

impl Sample {
    /// Offset as handed to the extractor (two decimals)
    pub fn seek_arg(&self) -> String {
        format!("{:.2}", self.offset)
    }

    /// Intermediate file stem; the index keeps names unique when offsets round together
    pub fn file_stem(&self) -> String {
        format!("sample-{:04}-{}", self.index, self.seek_arg())
    }
}

/// An extracted and converted frame awaiting ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub sample: Sample,
    pub path: PathBuf,
    /// Bytes of the converted encoding
    pub size: u64,
}

/// A candidate promoted to a durable output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// 1-based rank, largest converted size first
    pub rank: usize,
    pub offset: f64,
    pub size: u64,
    pub path: PathBuf,
}

impl Selection {
    /// Destination file name encoding rank and source offset
    pub fn file_name(rank: usize, sample: &Sample, extension: &str) -> String {
        format!("thumbnail-{:03}-{}.{}", rank, sample.seek_arg(), extension)
    }
}

/// Thumbnail generation request
#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub sample_count: usize,
    pub keep_count: usize,
}

impl ThumbnailRequest {
    /// Create a request, rejecting zero counts
    pub fn new(
        source: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        sample_count: usize,
        keep_count: usize,
    ) -> Result<Self, DomainError> {
        if sample_count == 0 {
            return Err(DomainError::BadArgs(
                "sample count must be at least 1".to_string(),
            ));
        }
        if keep_count == 0 {
            return Err(DomainError::BadArgs(
                "keep count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            source: source.into(),
            output_dir: output_dir.into(),
            sample_count,
            keep_count,
        })
    }

    /// Number of selections a successful run yields
    pub fn expected_selections(&self) -> usize {
        self.keep_count.min(self.sample_count)
    }
}

/// Outcome of a thumbnail run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailReport {
    pub source: PathBuf,
    pub duration: f64,
    pub samples: Vec<Sample>,
    pub selections: Vec<Selection>,
}

impl ThumbnailReport {
    /// Destination paths in rank order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.selections.iter().map(|s| s.path.clone()).collect()
    }
}

/// Stream-copy trim request
#[derive(Debug, Clone)]
pub struct TrimRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: Option<TimeSpec>,
    pub stop: Option<TimeSpec>,
}

impl TrimRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        start: Option<TimeSpec>,
        stop: Option<TimeSpec>,
    ) -> Result<Self, DomainError> {
        if let (Some(start), Some(stop)) = (start, stop) {
            if start.seconds >= stop.seconds {
                return Err(DomainError::BadArgs(format!(
                    "start ({}) must be before stop ({})",
                    start, stop
                )));
            }
        }
        Ok(Self {
            input: input.into(),
            output: output.into(),
            start,
            stop,
        })
    }

    /// No bounds means the input is copied as-is
    pub fn is_passthrough(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }
}

/// MP3 extraction request
#[derive(Debug, Clone)]
pub struct AudioRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Bitrate in kbit/s
    pub bitrate_kbps: u32,
    pub sample_rate: u32,
}

/// A claimed range to silence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuteRange {
    pub start: TimeSpec,
    pub stop: TimeSpec,
}

impl MuteRange {
    pub fn new(start: TimeSpec, stop: TimeSpec) -> Result<Self, DomainError> {
        if start.seconds >= stop.seconds {
            return Err(DomainError::BadArgs(format!(
                "mute range start ({}) must be before stop ({})",
                start, stop
            )));
        }
        Ok(Self { start, stop })
    }
}

impl FromStr for MuteRange {
    type Err = DomainError;

    /// Parse `START-STOP`, each side in any [`TimeSpec`] format
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, stop) = s
            .split_once('-')
            .ok_or_else(|| DomainError::BadArgs(format!("expected START-STOP, got {:?}", s)))?;
        Self::new(TimeSpec::parse(start)?, TimeSpec::parse(stop)?)
    }
}

/// Mute request
#[derive(Debug, Clone)]
pub struct MuteRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ranges: Vec<MuteRange>,
}

/// Target widths for the resize step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    P720,
    P1080,
    K2,
    K4,
}

impl Resolution {
    /// Parse a resolution name
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "720p" => Ok(Resolution::P720),
            "1080p" => Ok(Resolution::P1080),
            "2k" => Ok(Resolution::K2),
            "4k" => Ok(Resolution::K4),
            other => Err(DomainError::BadArgs(format!(
                "Invalid resolution: {}. Valid options: 720p, 1080p, 2k, 4k",
                other
            ))),
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Resolution::P720 => 1280,
            Resolution::P1080 => 1920,
            Resolution::K2 => 2560,
            Resolution::K4 => 3840,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
            Resolution::K2 => "2k",
            Resolution::K4 => "4k",
        };
        write!(f, "{}", name)
    }
}

/// One input of a concat job and its homogenized sibling
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatEntry {
    pub source: PathBuf,
    pub resized: PathBuf,
}

/// A parsed concat list ready for execution
#[derive(Debug, Clone)]
pub struct ConcatPlan {
    pub entries: Vec<ConcatEntry>,
    pub resolution: Resolution,
    pub framerate: u32,
    /// List file handed to the concat demuxer
    pub converted_list: PathBuf,
    pub output: PathBuf,
}

impl ConcatPlan {
    /// Contents of the converted list file
    pub fn converted_list_contents(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("file '{}'\n", entry.resized.display()))
            .collect()
    }
}

/// Name of the resized sibling of `source`
pub fn resized_path(source: &Path, resolution: Resolution, framerate: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    source.with_file_name(format!(
        "{}-{}-{}fps{}",
        stem,
        resolution.width(),
        framerate,
        extension
    ))
}
