use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::Result;

/// A decoded image and where it came from. Replaced wholesale on every load.
pub struct ImageDocument {
    pixels: RgbaImage,
    path: Option<PathBuf>,
}

impl ImageDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let pixels = image::open(path)?.to_rgba8();
        tracing::info!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            "loaded image"
        );
        Ok(Self {
            pixels,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already decoded raster that has no backing file.
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self { pixels, path: None }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory exports are written into: beside the source file, if any.
    pub fn directory(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }
}
