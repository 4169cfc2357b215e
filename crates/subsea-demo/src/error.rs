//! Errors surfaced by the demo binary.

use subsea_core::CorrectionError;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameter file: {0}")]
    Params(#[from] serde_json::Error),
    #[error("invalid matrix file: {0}")]
    Matrix(serde_json::Error),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("frame buffer does not match {width}x{height}")]
    FrameSize { width: u32, height: u32 },
    #[error("usage: subsea-demo <input image or frame directory> <output path>")]
    Usage,
    #[error(transparent)]
    Correction(#[from] CorrectionError),
}
