//! RGBA8 frame buffer conventions shared by every pass over the pixels.

use crate::error::{CorrectionError, Result};

/// Samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Largest value an 8-bit channel sample can hold.
pub const MAX_CHANNEL_VALUE: f64 = 255.0;

/// Validate `pixels` against the frame dimensions and return the pixel count.
///
/// The buffer must be row-major RGBA with exactly `width × height × 4` samples.
/// A zero-area frame is rejected because the average color is undefined.
pub fn pixel_count(pixels: &[u8], width: u32, height: u32) -> Result<usize> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .unwrap_or(usize::MAX);

    if pixels.len() != expected {
        return Err(CorrectionError::InvalidBuffer {
            expected,
            actual: pixels.len(),
        });
    }
    if expected == 0 {
        return Err(CorrectionError::EmptyFrame { width, height });
    }

    Ok(expected / CHANNELS)
}

/// Round a channel value the way an 8-bit clamped array stores it.
///
/// NaN maps to 0.
pub fn clamp_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, MAX_CHANNEL_VALUE) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_count_matches_dimensions() {
        let pixels = vec![0u8; 3 * 2 * CHANNELS];
        assert_eq!(pixel_count(&pixels, 3, 2), Ok(6));
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let pixels = vec![0u8; 10];
        assert_eq!(
            pixel_count(&pixels, 2, 2),
            Err(CorrectionError::InvalidBuffer { expected: 16, actual: 10 })
        );
    }

    #[test]
    fn test_zero_area_is_rejected() {
        assert_eq!(
            pixel_count(&[], 0, 4),
            Err(CorrectionError::EmptyFrame { width: 0, height: 4 })
        );
    }

    #[test]
    fn test_clamp_channel_rounds_half_to_even() {
        assert_eq!(clamp_channel(2.5), 2);
        assert_eq!(clamp_channel(3.5), 4);
        assert_eq!(clamp_channel(-12.0), 0);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(f64::NAN), 0);
    }
}
