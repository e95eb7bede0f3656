use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, MagickAdapter, ResizeSettings};
use crate::app::{MediaInteractor, ThumbnailFormats, ThumbnailInteractor};
use crate::config_initialization::AppConfig;
use crate::ports::{ConvertPort, FrameExtractPort, MediaExecPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn thumbnail_interactor(&self) -> Arc<ThumbnailInteractor>;
    fn media_interactor(&self) -> Arc<MediaInteractor>;
}

/// Wires the external-tool adapters into the interactors
pub struct DefaultAppContainer {
    thumbnail_interactor: Arc<ThumbnailInteractor>,
    media_interactor: Arc<MediaInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Self {
        let probe_port = Arc::new(FFprobeAdapter::new(config.tools.ffprobe.as_str()));
        let ffmpeg = Arc::new(FFmpegAdapter::new(
            config.tools.ffmpeg.as_str(),
            ResizeSettings {
                video_encoder: config.transcode.video_encoder.clone(),
                quality: config.transcode.quality,
            },
        ));
        let convert_port = Arc::new(MagickAdapter::new(config.tools.magick.as_str()));

        let thumbnail_interactor = Arc::new(ThumbnailInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            Arc::clone(&ffmpeg) as Arc<dyn FrameExtractPort>,
            convert_port as Arc<dyn ConvertPort>,
            ThumbnailFormats {
                frame: config.thumbnails.frame_format.clone(),
                ranked: config.thumbnails.ranked_format.clone(),
            },
        ));

        let media_interactor = Arc::new(MediaInteractor::new(ffmpeg as Arc<dyn MediaExecPort>));

        Self {
            thumbnail_interactor,
            media_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn thumbnail_interactor(&self) -> Arc<ThumbnailInteractor> {
        Arc::clone(&self.thumbnail_interactor)
    }

    fn media_interactor(&self) -> Arc<MediaInteractor> {
        Arc::clone(&self.media_interactor)
    }
}
