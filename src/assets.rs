//! Memory panel image loading

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AssetError;

/// Decoded RGBA8 image backing a memory panel
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTexture {
    /// The resource handle the image was loaded from
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<Vec<u8>>,
}

impl MemoryTexture {
    /// Width over height; 1.0 for degenerate images.
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Turns a resource handle into a decoded texture. Blocking.
pub trait ImageLoader: Send + Sync {
    fn load(&self, url: &str) -> Result<MemoryTexture, AssetError>;
}

/// Loads images from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against
/// `base_dir` when one is set, else the working directory.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    base_dir: Option<PathBuf>,
}

impl FsImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Map a resource handle to a filesystem path
    pub fn resolve(&self, url: &str) -> Result<PathBuf, AssetError> {
        let raw = url.trim();
        let path_str = match raw.strip_prefix("file://") {
            Some(rest) => rest,
            None if raw.contains("://") || raw.starts_with("blob:") => {
                return Err(AssetError::UnsupportedUrl(url.to_string()));
            }
            None => raw,
        };

        if path_str.is_empty() {
            return Err(AssetError::NotFound(url.to_string()));
        }

        let path = Path::new(path_str);
        Ok(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> Result<MemoryTexture, AssetError> {
        let path = self.resolve(url)?;
        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        let img = image::open(&path).map_err(|e| AssetError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        tracing::debug!("Loaded memory image {} ({}x{})", path.display(), width, height);

        Ok(MemoryTexture {
            source: url.to_string(),
            width,
            height,
            pixels: Arc::new(rgba.into_raw()),
        })
    }
}
