//! FFmpeg execution adapter
//!
//! Argument lists are built by free functions so they can be checked
//! without running ffmpeg.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::adapters::process::{ToolCommand, ToolOutput};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Encoder settings for the resize step
#[derive(Debug, Clone)]
pub struct ResizeSettings {
    pub video_encoder: String,
    pub quality: u32,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            video_encoder: "hevc_nvenc".to_string(),
            quality: 24,
        }
    }
}

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
    resize: ResizeSettings,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<String>, resize: ResizeSettings) -> Self {
        Self {
            program: program.into(),
            resize,
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<ToolOutput, DomainError> {
        ToolCommand::new(&self.program)
            .args(args)
            .run()
            .await
            .map_err(|e| DomainError::ToolUnavailable {
                tool: self.program.clone(),
                message: e.to_string(),
            })
    }

    async fn run_checked(&self, args: Vec<OsString>) -> Result<(), DomainError> {
        let output = self.run(args).await?;
        if output.success() {
            Ok(())
        } else {
            Err(DomainError::CommandFailed {
                tool: self.program.clone(),
                status: output.status_label(),
                message: output.stderr_tail(3),
            })
        }
    }
}

fn os(arg: impl Into<OsString>) -> OsString {
    arg.into()
}

/// Seek-before-input single frame grab; `-ss` precedes `-i`.
pub fn extract_frame_args(source: &Path, sample: &Sample, destination: &Path) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-accurate_seek"),
        os("-ss"),
        os(sample.seek_arg()),
        os("-i"),
        source.as_os_str().to_owned(),
        os("-frames:v"),
        os("1"),
        destination.as_os_str().to_owned(),
    ]
}

pub fn trim_args(request: &TrimRequest) -> Vec<OsString> {
    let mut args = vec![os("-y"), os("-i"), request.input.as_os_str().to_owned()];
    if let Some(start) = request.start {
        args.push(os("-ss"));
        args.push(os(start.to_ffmpeg_arg()));
    }
    if let Some(stop) = request.stop {
        args.push(os("-to"));
        args.push(os(stop.to_ffmpeg_arg()));
    }
    args.push(os("-c"));
    args.push(os("copy"));
    args.push(request.output.as_os_str().to_owned());
    args
}

pub fn audio_args(request: &AudioRequest) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-i"),
        request.input.as_os_str().to_owned(),
        os("-vn"),
        os("-acodec"),
        os("libmp3lame"),
        os("-ac"),
        os("2"),
        os("-ab"),
        os(format!("{}k", request.bitrate_kbps)),
        os("-ar"),
        os(request.sample_rate.to_string()),
        request.output.as_os_str().to_owned(),
    ]
}

pub fn mute_args(request: &MuteRequest, filter: &str) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-i"),
        request.input.as_os_str().to_owned(),
        os("-vcodec"),
        os("copy"),
        os("-af"),
        os(filter),
        request.output.as_os_str().to_owned(),
    ]
}

pub fn resize_args(
    entry: &ConcatEntry,
    resolution: Resolution,
    framerate: u32,
    settings: &ResizeSettings,
) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-i"),
        entry.source.as_os_str().to_owned(),
        os("-vf"),
        os(format!(
            "scale={}:-2,setsar=1:1,fps={}",
            resolution.width(),
            framerate
        )),
        os("-c:v"),
        os(settings.video_encoder.as_str()),
        os("-rc"),
        os("constqp"),
        os("-qp"),
        os(settings.quality.to_string()),
        os("-preset"),
        os("p7"),
        os("-tune"),
        os("hq"),
        os("-rc-lookahead"),
        os("4"),
        os("-c:a"),
        os("copy"),
        entry.resized.as_os_str().to_owned(),
    ]
}

pub fn concat_args(list_file: &Path, output: &Path) -> Vec<OsString> {
    vec![
        os("-y"),
        os("-safe"),
        os("0"),
        os("-f"),
        os("concat"),
        os("-i"),
        list_file.as_os_str().to_owned(),
        os("-c"),
        os("copy"),
        output.as_os_str().to_owned(),
    ]
}

#[async_trait]
impl FrameExtractPort for FFmpegAdapter {
    async fn extract_frame(
        &self,
        source: &Path,
        sample: &Sample,
        destination: &Path,
    ) -> Result<(), DomainError> {
        let output = ToolCommand::new(&self.program)
            .args(extract_frame_args(source, sample, destination))
            .run()
            .await
            .map_err(|e| DomainError::ExtractionFailed {
                offset: sample.offset,
                message: format!("could not run {}: {}", self.program, e),
            })?;

        if !output.success() {
            return Err(DomainError::ExtractionFailed {
                offset: sample.offset,
                message: format!("{}: {}", output.status_label(), output.stderr_tail(2)),
            });
        }
        if !destination.exists() {
            return Err(DomainError::ExtractionFailed {
                offset: sample.offset,
                message: "no frame written (offset past end of stream?)".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MediaExecPort for FFmpegAdapter {
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
        self.run_checked(trim_args(request)).await
    }

    async fn extract_audio(&self, request: &AudioRequest) -> Result<(), DomainError> {
        self.run_checked(audio_args(request)).await
    }

    async fn mute(&self, request: &MuteRequest, filter: &str) -> Result<(), DomainError> {
        self.run_checked(mute_args(request, filter)).await
    }

    async fn resize(
        &self,
        entry: &ConcatEntry,
        resolution: Resolution,
        framerate: u32,
    ) -> Result<(), DomainError> {
        info!(
            "Resizing \"{}\" @ {} {}fps",
            entry.source.display(),
            resolution,
            framerate
        );
        self.run_checked(resize_args(entry, resolution, framerate, &self.resize))
            .await
    }

    async fn concat(&self, list_file: &Path, output: &Path) -> Result<(), DomainError> {
        self.run_checked(concat_args(list_file, output)).await
    }
}
