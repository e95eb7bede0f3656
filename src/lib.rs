//! encore library
//!
//! Concert-video archive toolkit built as ports and adapters around
//! ffmpeg, ffprobe and ImageMagick.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    Candidate, Sample, Selection, ThumbnailReport, ThumbnailRequest, TimeSpec,
};
