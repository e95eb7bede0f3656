// Media interactor - Trim, audio rip, mute and resize+concat use cases

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for single-file media operations
pub struct MediaInteractor {
    execute_port: Arc<dyn MediaExecPort>,
}

impl MediaInteractor {
    /// Create new media interactor with injected port
    pub fn new(execute_port: Arc<dyn MediaExecPort>) -> Self {
        Self { execute_port }
    }

    fn require_input(path: &Path) -> Result<(), DomainError> {
        if path.is_file() {
            Ok(())
        } else {
            Err(DomainError::InputNotFound(path.to_path_buf()))
        }
    }

    async fn ensure_parent(path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Trim; without bounds the input is copied unchanged
    pub async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
        Self::require_input(&request.input)?;
        Self::ensure_parent(&request.output).await?;

        if request.is_passthrough() {
            info!(
                "No trim bounds, copying \"{}\" as-is",
                request.input.display()
            );
            tokio::fs::copy(&request.input, &request.output).await?;
            return Ok(());
        }
        self.execute_port.trim(request).await
    }

    /// Rip MP3 audio at `bitrate` (leading digits, kbit/s)
    pub async fn extract_audio(
        &self,
        input: &Path,
        output: &Path,
        bitrate: &str,
        sample_rate: u32,
    ) -> Result<AudioRequest, DomainError> {
        Self::require_input(input)?;
        if sample_rate == 0 {
            return Err(DomainError::BadArgs("sample rate must be positive".to_string()));
        }
        let request = AudioRequest {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            bitrate_kbps: AudioRules::parse_bitrate(bitrate)?,
            sample_rate,
        };
        Self::ensure_parent(output).await?;
        self.execute_port.extract_audio(&request).await?;
        Ok(request)
    }

    /// Silence every range; returns the filter that was applied
    pub async fn mute(&self, request: &MuteRequest) -> Result<String, DomainError> {
        Self::require_input(&request.input)?;
        let filter = MuteFilter::build(&request.ranges)?;
        Self::ensure_parent(&request.output).await?;
        self.execute_port.mute(request, &filter).await?;
        Ok(filter)
    }

    /// Parse a concat list without touching any media
    pub async fn plan_concat(
        &self,
        list_path: &Path,
        resolution: Resolution,
        framerate: u32,
        output: Option<&Path>,
    ) -> Result<ConcatPlan, DomainError> {
        Self::require_input(list_path)?;
        let contents = tokio::fs::read_to_string(list_path).await?;
        ConcatListParser::plan(list_path, &contents, resolution, framerate, output)
    }

    /// Homogenize every input, write the converted list, then join
    pub async fn concat(&self, plan: &ConcatPlan) -> Result<(), DomainError> {
        for entry in &plan.entries {
            Self::require_input(&entry.source)?;
        }

        tokio::fs::write(&plan.converted_list, plan.converted_list_contents()).await?;

        let total = plan.entries.len();
        for (idx, entry) in plan.entries.iter().enumerate() {
            info!(
                "Converting {} / {} \"{}\"",
                idx + 1,
                total,
                entry.source.display()
            );
            self.execute_port
                .resize(entry, plan.resolution, plan.framerate)
                .await?;
        }

        info!("Concatenating into \"{}\"", plan.output.display());
        Self::ensure_parent(&plan.output).await?;
        self.execute_port
            .concat(&plan.converted_list, &plan.output)
            .await
    }
}
