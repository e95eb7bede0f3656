//! Output path helpers

use std::path::{Path, PathBuf};

/// Path helpers for command defaults
pub struct PathUtils;

impl PathUtils {
    /// Directory holding the source video (`.` for bare file names)
    pub fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// `<video dir>/thumbnails`
    pub fn default_thumbnail_dir(video: &Path) -> PathBuf {
        Self::parent_dir(video).join("thumbnails")
    }

    /// Where a promoted thumbnail lands next to the video
    pub fn promotion_target(video: &Path, thumbnail: &Path) -> Option<PathBuf> {
        thumbnail
            .file_name()
            .map(|name| Self::parent_dir(video).join(name))
    }
}
