// Business rules - Pure decision logic shared by the interactors

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::DomainError;
use crate::domain::model::*;

/// Sampling schedule for thumbnail extraction
pub struct SampleSchedule;

impl SampleSchedule {
    /// Evenly spaced offsets: `(i - 0.5) * duration / (count + 1)` for `i` in `1..=count`.
    ///
    /// Offsets are strictly increasing and never touch the first or last frame.
    pub fn offsets(duration: f64, count: usize) -> Vec<Sample> {
        let bin = duration / (count as f64 + 1.0);
        (1..=count)
            .map(|i| Sample {
                index: i - 1,
                offset: (i as f64 - 0.5) * bin,
            })
            .collect()
    }
}

/// Ranks candidates by converted size
pub struct CandidateRanker;

impl CandidateRanker {
    /// Largest first. The sort is stable, so equal sizes keep sample order.
    pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.sort_by(|a, b| b.size.cmp(&a.size));
        candidates
    }

    /// The first `keep` ranked candidates
    pub fn select(candidates: Vec<Candidate>, keep: usize) -> Vec<Candidate> {
        let mut ranked = Self::rank(candidates);
        ranked.truncate(keep);
        ranked
    }
}

static BITRATE_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// Audio encoding rules
pub struct AudioRules;

impl AudioRules {
    /// Leading digits of a bitrate string (`"320k"`, `"320kbps"`, `"320"`) in kbit/s
    pub fn parse_bitrate(bitrate: &str) -> Result<u32, DomainError> {
        let digits = BITRATE_DIGITS_RE
            .captures(bitrate)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid bitrate: {:?}", bitrate)))?;
        let kbps: u32 = digits
            .as_str()
            .parse()
            .map_err(|_| DomainError::BadArgs(format!("Invalid bitrate: {:?}", bitrate)))?;
        if kbps == 0 {
            return Err(DomainError::BadArgs("Bitrate must be positive".to_string()));
        }
        Ok(kbps)
    }
}

/// Volume filter that silences every range
pub struct MuteFilter;

impl MuteFilter {
    /// `volume=enable='between(t,S,E)':volume=0` per range, sorted by start, joined by `, `
    pub fn build(ranges: &[MuteRange]) -> Result<String, DomainError> {
        if ranges.is_empty() {
            return Err(DomainError::BadArgs(
                "at least one mute range is required".to_string(),
            ));
        }
        let mut sorted = ranges.to_vec();
        sorted.sort_by(|a, b| a.start.seconds.total_cmp(&b.start.seconds));
        Ok(sorted
            .iter()
            .map(|range| {
                format!(
                    "volume=enable='between(t,{},{})':volume=0",
                    range.start.seconds, range.stop.seconds
                )
            })
            .collect::<Vec<_>>()
            .join(", "))
    }
}

static CONCAT_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^file '(.*)'$").unwrap());

/// Concat list parsing
pub struct ConcatListParser;

impl ConcatListParser {
    /// Parse `file '<path>'` lines into a plan.
    ///
    /// Relative paths resolve against `list_path`'s directory. The output
    /// defaults to `concatenated<ext>` next to the first input.
    pub fn plan(
        list_path: &Path,
        contents: &str,
        resolution: Resolution,
        framerate: u32,
        output: Option<&Path>,
    ) -> Result<ConcatPlan, DomainError> {
        if framerate == 0 {
            return Err(DomainError::BadArgs("framerate must be positive".to_string()));
        }
        // ffmpeg resolves concat entries against the list's directory, so
        // entries written to the converted list must be absolute.
        let parent = list_path.parent().unwrap_or_else(|| Path::new(""));
        let base = if parent.is_absolute() {
            parent.to_path_buf()
        } else {
            std::env::current_dir()?.join(parent)
        };

        let mut entries = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }
            let caps = CONCAT_LINE_RE.captures(stripped).ok_or_else(|| {
                DomainError::InvalidConcatList {
                    path: list_path.to_path_buf(),
                    line: idx + 1,
                    message: "expected file '<path>'".to_string(),
                }
            })?;
            let source = base.join(&caps[1]);
            let resized = resized_path(&source, resolution, framerate);
            entries.push(ConcatEntry { source, resized });
        }

        let first = entries.first().ok_or_else(|| DomainError::InvalidConcatList {
            path: list_path.to_path_buf(),
            line: 0,
            message: "no file entries".to_string(),
        })?;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => {
                let extension = first
                    .source
                    .extension()
                    .map(|ext| format!(".{}", ext.to_string_lossy()))
                    .unwrap_or_default();
                first
                    .source
                    .with_file_name(format!("concatenated{}", extension))
            }
        };

        let mut converted_list = list_path.as_os_str().to_owned();
        converted_list.push("-converted");

        Ok(ConcatPlan {
            entries,
            resolution,
            framerate,
            converted_list: converted_list.into(),
            output,
        })
    }
}
