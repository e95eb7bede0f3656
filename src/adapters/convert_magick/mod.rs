//! ImageMagick batch conversion adapter

use std::path::PathBuf;

use async_trait::async_trait;

use crate::adapters::process::ToolCommand;
use crate::domain::errors::*;
use crate::ports::*;

/// Converts frames with a single `magick mogrify -format <fmt> ...` call
pub struct MagickAdapter {
    program: String,
}

impl MagickAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Where mogrify writes the re-encoded copy of each frame
    pub fn converted_paths(frames: &[PathBuf], format: &str) -> Vec<PathBuf> {
        frames
            .iter()
            .map(|frame| frame.with_extension(format))
            .collect()
    }

    pub fn command(&self, frames: &[PathBuf], format: &str) -> ToolCommand {
        ToolCommand::new(&self.program)
            .args(["mogrify", "-format", format])
            .args(frames)
    }
}

#[async_trait]
impl ConvertPort for MagickAdapter {
    async fn convert_batch(
        &self,
        frames: &[PathBuf],
        format: &str,
    ) -> Result<Vec<PathBuf>, DomainError> {
        if frames.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .command(frames, format)
            .run()
            .await
            .map_err(|e| {
                DomainError::ConversionFailed(format!("could not run {}: {}", self.program, e))
            })?;

        if !output.success() {
            return Err(DomainError::ConversionFailed(format!(
                "{}: {}",
                output.status_label(),
                output.stderr_tail(2)
            )));
        }
        Ok(Self::converted_paths(frames, format))
    }
}
