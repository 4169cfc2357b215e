//! Error taxonomy for the correction engine.

/// Failures that abort a single matrix computation before any pixel is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrectionError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for the given dimensions")]
    InvalidBuffer { expected: usize, actual: usize },
    #[error("frame has zero area ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("parameter `{name}` out of range: {value}")]
    ParameterOutOfRange { name: &'static str, value: f64 },
    #[error("invalid color matrix: {0}")]
    InvalidMatrix(String),
    #[error("failed to encode cache key: {0}")]
    CacheKey(String),
}

impl From<serde_json::Error> for CorrectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::CacheKey(err.to_string())
    }
}

pub type Result<T, E = CorrectionError> = std::result::Result<T, E>;
