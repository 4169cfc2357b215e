//! Subsea Core — color-cast correction for underwater frames.
//!
//! This crate computes a 4×5 affine color matrix per frame, either
//! automatically from the frame's histogram and shooting depth or manually
//! from channel multipliers, smooths it across frames, and applies it to an
//! RGBA8 buffer. No file, decoder or display dependencies.

pub mod cache;
pub mod error;
pub mod frame;
pub mod grading;
pub mod matrix;
pub mod scopes;
pub mod session;
pub mod smoothing;
pub mod transform;

// Re-exports for convenience.
pub use error::CorrectionError;
pub use grading::auto_correct::auto_correct;
pub use matrix::ColorMatrix;
pub use scopes::histogram::analyze;
pub use session::CorrectionSession;
pub use smoothing::TemporalSmoother;
pub use transform::builder::{build_auto, build_manual};
pub use transform::params::{CorrectionMode, ParameterSet};
