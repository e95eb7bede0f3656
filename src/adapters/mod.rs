// Adapters - External system implementations

pub mod convert_magick;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process;
pub mod toml_config;
pub mod toolchain;

// Re-export adapters
pub use convert_magick::MagickAdapter;
pub use exec_ffmpeg::{FFmpegAdapter, ResizeSettings};
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use toolchain::{Toolchain, ToolchainReport, ToolRole};
