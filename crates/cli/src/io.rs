//! PNG glue between files on disk and the engine buffers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{GrayImage, RgbaImage};

use hpcimg_algorithms::morphology::{ElementLoader, StructuringElement};
use hpcimg_core::{ChannelOrder, Error, Grid, PixelBuffer};

/// Read any PNG as an RGBA pixel buffer
pub fn read_image(path: &Path) -> Result<PixelBuffer> {
    let rgba = image::open(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?
        .to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    PixelBuffer::from_raw(width, height, ChannelOrder::Rgba, rgba.into_raw())
        .context("Unexpected image layout")
}

/// Write a pixel buffer as an RGBA PNG
pub fn write_image(image: &PixelBuffer, path: &Path) -> Result<()> {
    let rgba = image.to_order(ChannelOrder::Rgba);
    let buffer = RgbaImage::from_raw(image.width() as u32, image.height() as u32, rgba.into_raw())
        .context("Pixel buffer does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write a height-map as an 8-bit gray PNG
pub fn write_grid(grid: Grid, path: &Path) -> Result<()> {
    let size = grid.size() as u32;
    let buffer = GrayImage::from_raw(size, size, grid.into_vec())
        .context("Grid does not match its dimensions")?;
    buffer
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// First of `<name>.png`, `<name>1.png`, `<name>2.png`, ... that does not exist
pub fn next_free_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(format!("{}.png", name));
    if !first.exists() {
        return first;
    }
    (1u64..)
        .map(|n| dir.join(format!("{}{}.png", name, n)))
        .find(|path| !path.exists())
        .unwrap_or(first)
}

/// Loads `StructuringElement{size}.png` from a directory
#[derive(Debug, Clone)]
pub struct PngElementLoader {
    dir: PathBuf,
}

impl PngElementLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, size: usize) -> PathBuf {
        self.dir.join(format!("StructuringElement{}.png", size))
    }
}

impl ElementLoader for PngElementLoader {
    fn load(&self, size: usize) -> hpcimg_core::Result<StructuringElement> {
        let path = self.path_for(size);
        let rgba = image::open(&path)
            .map_err(|e| Error::Other(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        let bitmap = PixelBuffer::from_raw(width, height, ChannelOrder::Rgba, rgba.into_raw())?;
        StructuringElement::from_pixels(&bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hpcimg-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_next_free_path_never_overwrites() {
        let dir = scratch_dir("free-path");
        assert_eq!(next_free_path(&dir, "Opening"), dir.join("Opening.png"));
        fs::write(dir.join("Opening.png"), b"").unwrap();
        assert_eq!(next_free_path(&dir, "Opening"), dir.join("Opening1.png"));
        fs::write(dir.join("Opening1.png"), b"").unwrap();
        assert_eq!(next_free_path(&dir, "Opening"), dir.join("Opening2.png"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_png_element_round_trip() {
        let dir = scratch_dir("element");
        let mut bitmap = PixelBuffer::filled(3, 3, ChannelOrder::Rgba, [0, 0, 0]).unwrap();
        for (row, col) in [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)] {
            bitmap.set_rgb(row, col, [255, 255, 255]).unwrap();
        }
        let loader = PngElementLoader::new(&dir);
        write_image(&bitmap, &loader.path_for(3)).unwrap();

        let element = loader.load(3).unwrap();
        assert_eq!(element, StructuringElement::cross(3).unwrap());
        assert!(loader.load(5).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_image_round_trip_keeps_pixels() {
        let dir = scratch_dir("image");
        let mut image = PixelBuffer::filled(4, 2, ChannelOrder::Bgra, [1, 2, 3]).unwrap();
        image.set_rgb(1, 3, [200, 100, 50]).unwrap();
        let path = dir.join("image.png");
        write_image(&image, &path).unwrap();

        let back = read_image(&path).unwrap();
        assert_eq!(back.order(), ChannelOrder::Rgba);
        assert_eq!(back.to_order(ChannelOrder::Bgra), image);
        fs::remove_dir_all(&dir).unwrap();
    }
}
