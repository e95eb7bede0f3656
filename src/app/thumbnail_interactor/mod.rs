// Thumbnail interactor - Sample, rank and keep representative frames

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::utils::path::PathUtils;

const SCRATCH_PREFIX: &str = ".encore-scratch-";

/// File extensions used by the two conversion stages
#[derive(Debug, Clone)]
pub struct ThumbnailFormats {
    /// What the extractor writes
    pub frame: String,
    /// What the converter produces; ranking measures this encoding
    pub ranked: String,
}

impl Default for ThumbnailFormats {
    fn default() -> Self {
        Self {
            frame: "bmp".to_string(),
            ranked: "jpg".to_string(),
        }
    }
}

/// Interactor for the thumbnail use case
pub struct ThumbnailInteractor {
    probe_port: Arc<dyn ProbePort>,
    extract_port: Arc<dyn FrameExtractPort>,
    convert_port: Arc<dyn ConvertPort>,
    formats: ThumbnailFormats,
}

impl ThumbnailInteractor {
    /// Create new thumbnail interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        extract_port: Arc<dyn FrameExtractPort>,
        convert_port: Arc<dyn ConvertPort>,
        formats: ThumbnailFormats,
    ) -> Self {
        Self {
            probe_port,
            extract_port,
            convert_port,
            formats,
        }
    }

    /// Generate thumbnails for `request.source` into `request.output_dir`.
    ///
    /// All-or-nothing: any probe, extraction or conversion failure aborts the
    /// call. Intermediates live in a scratch directory under `output_dir` that
    /// is removed on every exit path; on failure, destination files this call
    /// already copied are removed as well.
    pub async fn generate(&self, request: &ThumbnailRequest) -> Result<ThumbnailReport, DomainError> {
        if !request.source.is_file() {
            return Err(DomainError::InputNotFound(request.source.clone()));
        }
        let duration = self.probe_port.probe_duration(&request.source).await?;
        if !(duration > 0.0) {
            return Err(DomainError::ProbeFailed {
                path: request.source.clone(),
                message: format!("unusable duration {}", duration),
            });
        }
        info!(
            "Probed {}: {:.0}s, taking {} samples",
            request.source.display(),
            duration,
            request.sample_count
        );

        let samples = SampleSchedule::offsets(duration, request.sample_count);

        tokio::fs::create_dir_all(&request.output_dir).await?;

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&request.output_dir)?;
        debug!("Scratch directory: {}", scratch.path().display());

        let result = self.select_in(scratch.path(), request, &samples).await;
        let result = match result {
            Ok(chosen) => self.copy_selections(request, chosen).await,
            Err(e) => Err(e),
        };

        let scratch_path = scratch.path().to_path_buf();
        let cleanup = scratch.close();

        match (result, cleanup) {
            (Ok(selections), Ok(())) => {
                info!(
                    "Kept {} of {} thumbnails in {}",
                    selections.len(),
                    samples.len(),
                    request.output_dir.display()
                );
                Ok(ThumbnailReport {
                    source: request.source.clone(),
                    duration,
                    samples,
                    selections,
                })
            }
            (Ok(selections), Err(e)) => {
                warn!(
                    "Failed to remove scratch directory {}: {}",
                    scratch_path.display(),
                    e
                );
                remove_files(selections.iter().map(|s| s.path.as_path())).await;
                Err(DomainError::Io(e))
            }
            (Err(e), cleanup) => {
                if let Err(cleanup_err) = cleanup {
                    warn!(
                        "Failed to remove scratch directory {}: {}",
                        scratch_path.display(),
                        cleanup_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Extract, convert, measure and rank inside `scratch`
    async fn select_in(
        &self,
        scratch: &Path,
        request: &ThumbnailRequest,
        samples: &[Sample],
    ) -> Result<Vec<Candidate>, DomainError> {
        let mut frames = Vec::with_capacity(samples.len());
        for sample in samples {
            let frame = scratch.join(format!("{}.{}", sample.file_stem(), self.formats.frame));
            debug!(
                "Extracting frame {}/{} at {}s",
                sample.index + 1,
                samples.len(),
                sample.seek_arg()
            );
            self.extract_port
                .extract_frame(&request.source, sample, &frame)
                .await?;
            frames.push(frame);
        }

        info!(
            "Converting {} frames to {}",
            frames.len(),
            self.formats.ranked
        );
        let converted = self
            .convert_port
            .convert_batch(&frames, &self.formats.ranked)
            .await?;

        let mut candidates = Vec::with_capacity(samples.len());
        for (sample, path) in samples.iter().zip(converted) {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => candidates.push(Candidate {
                    sample: *sample,
                    path,
                    size: metadata.len(),
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Converted frame missing: {}", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        if candidates.len() != request.sample_count {
            return Err(DomainError::CandidateCountMismatch {
                expected: request.sample_count,
                found: candidates.len(),
            });
        }

        Ok(CandidateRanker::select(candidates, request.keep_count))
    }

    /// Copy ranked candidates to their durable names
    async fn copy_selections(
        &self,
        request: &ThumbnailRequest,
        chosen: Vec<Candidate>,
    ) -> Result<Vec<Selection>, DomainError> {
        let mut selections: Vec<Selection> = Vec::with_capacity(chosen.len());
        for (idx, candidate) in chosen.into_iter().enumerate() {
            let rank = idx + 1;
            let destination = request.output_dir.join(Selection::file_name(
                rank,
                &candidate.sample,
                &self.formats.ranked,
            ));
            if let Err(e) = tokio::fs::copy(&candidate.path, &destination).await {
                remove_files(selections.iter().map(|s| s.path.as_path())).await;
                return Err(e.into());
            }
            debug!(
                "Rank {}: {}s ({} bytes) -> {}",
                rank,
                candidate.sample.seek_arg(),
                candidate.size,
                destination.display()
            );
            selections.push(Selection {
                rank,
                offset: candidate.sample.offset,
                size: candidate.size,
                path: destination,
            });
        }
        Ok(selections)
    }

    /// Copy the top `count` selections next to the source video
    pub async fn promote(
        &self,
        report: &ThumbnailReport,
        count: usize,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let mut promoted = Vec::new();
        for selection in report.selections.iter().take(count) {
            let Some(target) = PathUtils::promotion_target(&report.source, &selection.path) else {
                continue;
            };
            tokio::fs::copy(&selection.path, &target).await?;
            promoted.push(target);
        }
        Ok(promoted)
    }
}

async fn remove_files<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
