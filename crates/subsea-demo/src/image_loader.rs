//! Image loading and saving for the demo application.

use std::path::{Path, PathBuf};

use crate::error::DemoError;

/// A decoded frame as a row-major RGBA8 buffer.
#[derive(Debug, Clone)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image from disk as RGBA8.
///
/// Supports common formats via the `image` crate (PNG, JPEG, TIFF, ...).
pub fn load_frame(path: &Path) -> Result<RgbaFrame, DemoError> {
    let rgba = image::open(path).map_err(DemoError::Decode)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbaFrame {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Save a frame, dropping alpha for formats that cannot store it.
pub fn save_frame(path: &Path, frame: RgbaFrame) -> Result<(), DemoError> {
    let (width, height) = (frame.width, frame.height);
    let rgba = image::RgbaImage::from_raw(width, height, frame.pixels)
        .ok_or(DemoError::FrameSize { width, height })?;
    let image = image::DynamicImage::ImageRgba8(rgba);

    let opaque_only = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"));
    if opaque_only {
        image.to_rgb8().save(path).map_err(DemoError::Encode)
    } else {
        image.save(path).map_err(DemoError::Encode)
    }
}

/// Image files in `dir`, sorted by name so they play back in order.
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>, DemoError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && image::ImageFormat::from_path(&path).is_ok() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("subsea-demo-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn test_png_keeps_pixels_and_alpha() {
        let dir = scratch_dir("png");
        let path = dir.join("frame.png");
        let frame = RgbaFrame {
            width: 2,
            height: 1,
            pixels: vec![10, 20, 30, 40, 200, 150, 100, 255],
        };
        save_frame(&path, frame.clone()).unwrap();
        let loaded = load_frame(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (2, 1));
        assert_eq!(loaded.pixels, frame.pixels);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_mismatched_buffer_is_rejected() {
        let dir = scratch_dir("size");
        let frame = RgbaFrame {
            width: 4,
            height: 4,
            pixels: vec![0; 3],
        };
        let result = save_frame(&dir.join("bad.png"), frame);
        assert!(matches!(result, Err(DemoError::FrameSize { width: 4, height: 4 })));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_frame_paths_are_sorted_images() {
        let dir = scratch_dir("clip");
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        let names: Vec<_> = frame_paths(&dir)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_owned))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        std::fs::remove_dir_all(dir).ok();
    }
}
