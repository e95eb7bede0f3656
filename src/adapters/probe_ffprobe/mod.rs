//! FFprobe adapter for media file probing
//!
//! Reads the `Duration: HH:MM:SS.ff` line of ffprobe's summary.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::adapters::process::ToolCommand;
use crate::domain::errors::*;
use crate::ports::*;

// whole seconds only; the fraction after the dot is dropped
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)duration:\s*([\d:]+)\.?").unwrap());

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Extract the duration, in whole seconds, from ffprobe's text output
pub fn parse_duration(output: &str) -> Option<f64> {
    let timestamp = DURATION_RE.captures(output)?.get(1)?.as_str();
    let fields: Vec<u64> = timestamp
        .split(':')
        .map(|field| field.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    let seconds = match fields.as_slice() {
        [h, m, s] => 3600 * h + 60 * m + s,
        [m, s] => 60 * m + s,
        [s] => *s,
        _ => return None,
    };
    Some(seconds as f64)
}

fn probe_failed(path: &Path, message: impl Into<String>) -> DomainError {
    DomainError::ProbeFailed {
        path: PathBuf::from(path),
        message: message.into(),
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        let output = ToolCommand::new(&self.program)
            .arg("-hide_banner")
            .arg(file_path)
            .run()
            .await
            .map_err(|e| probe_failed(file_path, format!("could not run {}: {}", self.program, e)))?;

        if !output.success() {
            return Err(probe_failed(
                file_path,
                format!("{}: {}", output.status_label(), output.stderr_tail(2)),
            ));
        }

        let duration = parse_duration(&output.combined())
            .ok_or_else(|| probe_failed(file_path, "no duration in ffprobe output"))?;
        debug!("Probed {}: {:.0}s", file_path.display(), duration);
        Ok(duration)
    }
}
