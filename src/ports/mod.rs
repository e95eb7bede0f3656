// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media duration probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of the media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}

/// Port for single still-frame extraction
#[async_trait]
pub trait FrameExtractPort: Send + Sync {
    /// Write exactly one raster frame taken at `sample.offset` to `destination`
    async fn extract_frame(
        &self,
        source: &Path,
        sample: &Sample,
        destination: &Path,
    ) -> Result<(), DomainError>;
}

/// Port for batch raster re-encoding
#[async_trait]
pub trait ConvertPort: Send + Sync {
    /// Re-encode every frame to `format`.
    ///
    /// Returns the converted sibling paths in input order. Implementations
    /// report a non-zero tool exit as [`DomainError::ConversionFailed`]; the
    /// caller checks the returned paths actually exist.
    async fn convert_batch(
        &self,
        frames: &[PathBuf],
        format: &str,
    ) -> Result<Vec<PathBuf>, DomainError>;
}

/// Port for whole-file media operations
#[async_trait]
pub trait MediaExecPort: Send + Sync {
    /// Stream-copy a time range
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError>;

    /// Rip a stereo MP3 track
    async fn extract_audio(&self, request: &AudioRequest) -> Result<(), DomainError>;

    /// Apply a volume filter, copying the video stream
    async fn mute(&self, request: &MuteRequest, filter: &str) -> Result<(), DomainError>;

    /// Re-encode one concat input to the plan's resolution and framerate
    async fn resize(
        &self,
        entry: &ConcatEntry,
        resolution: Resolution,
        framerate: u32,
    ) -> Result<(), DomainError>;

    /// Join the files named in a concat list without re-encoding
    async fn concat(&self, list_file: &Path, output: &Path) -> Result<(), DomainError>;
}
