//! Automatic underwater color correction.
//!
//! # Algorithm
//! 1. Compute the average color of the frame
//! 2. Build a coarse histogram at the starting hue with the tone knobs applied
//!    (diagnostic only, discarded)
//! 3. Search the hue shift that restores the depth-dependent red energy
//! 4. Build the histogram of the frame with red replaced by the rotated energy
//! 5. Stretch each channel across its widest near-empty bucket gap
//! 6. Assemble the matrix from gains, offsets, the rotated unit vector and
//!    the blue magic boost

use crate::error::Result;
use crate::frame;
use crate::grading::hue_shift::{self, TrigCache};
use crate::grading::normalize;
use crate::matrix::ColorMatrix;
use crate::scopes::{Channel, histogram};
use crate::transform::builder;
use crate::transform::params::ParameterSet;

/// Compute the auto-mode matrix for one frame. The buffer is only read.
pub fn auto_correct(
    trig: &mut TrigCache,
    pixels: &[u8],
    width: u32,
    height: u32,
    params: &ParameterSet,
) -> Result<ColorMatrix> {
    params.validate()?;
    let count = frame::pixel_count(pixels, width, height)?;

    let avg = histogram::average_color(pixels, width, height)?;
    let base = params.base_hue_degrees();

    let coarse = histogram::coarse_histogram(pixels, trig, base, &params.tone());
    tracing::trace!(
        red = coarse.populated(Channel::Red),
        green = coarse.populated(Channel::Green),
        blue = coarse.populated(Channel::Blue),
        "coarse histogram populated buckets"
    );

    let shift = hue_shift::find_hue_shift(trig, avg, params.depth, base);

    let rotated = histogram::rotated_histogram(pixels, trig, shift);
    let level = normalize::threshold_level(count, params.threshold_ratio);
    let stretch = normalize::normalize(&rotated, level);

    tracing::debug!(
        depth = params.depth,
        shift,
        ?stretch,
        avg_r = avg.r,
        avg_g = avg.g,
        avg_b = avg.b,
        "auto correction computed"
    );

    Ok(builder::build_auto(
        trig,
        &stretch,
        shift,
        params.blue_magic,
        params.multipliers(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorrectionError;

    const EPSILON: f64 = 1e-9;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat((width * height) as usize)
    }

    #[test]
    fn test_blue_frame_at_depth_twenty() {
        let pixels = solid(10, 10, [0, 0, 200, 255]);
        let mut trig = TrigCache::new();
        let m = auto_correct(&mut trig, &pixels, 10, 10, &ParameterSet::auto(20.0)).unwrap();

        // blue sits alone in bucket 200, so the stretch is [199, 201]
        assert!((m.get(2, 2) - 128.0).abs() < EPSILON);
        assert!((m.get(2, 4) + 99.5).abs() < EPSILON);
        // red collapses into bucket 0, leaving the unit gap [0, 1]
        let unit = trig.rotate([1.0, 1.0, 1.0], 45);
        assert!((m.get(0, 0) - unit[0] * 256.0).abs() < EPSILON);
        assert!((m.get(0, 2) - unit[2] * 256.0 * 1.2).abs() < EPSILON);
        assert!(m.has_identity_alpha());
    }

    #[test]
    fn test_buffer_is_not_modified() {
        let pixels: Vec<u8> = (0..64u8).flat_map(|i| [i, i * 2, 255 - i, 255]).collect();
        let copy = pixels.clone();
        let mut trig = TrigCache::new();
        auto_correct(&mut trig, &pixels, 8, 8, &ParameterSet::auto(10.0)).unwrap();
        assert_eq!(pixels, copy);
    }

    #[test]
    fn test_invalid_buffer_is_reported() {
        let mut trig = TrigCache::new();
        let result = auto_correct(&mut trig, &[0; 7], 1, 2, &ParameterSet::auto(20.0));
        assert_eq!(
            result,
            Err(CorrectionError::InvalidBuffer { expected: 8, actual: 7 })
        );
    }

    #[test]
    fn test_invalid_params_are_reported() {
        let mut trig = TrigCache::new();
        let params = ParameterSet { threshold_ratio: -3.0, ..ParameterSet::auto(20.0) };
        let result = auto_correct(&mut trig, &solid(1, 1, [1, 2, 3, 4]), 1, 1, &params);
        assert!(matches!(result, Err(CorrectionError::ParameterOutOfRange { .. })));
    }

    #[test]
    fn test_same_frame_gives_identical_matrix() {
        let pixels: Vec<u8> = (0..100u8).flat_map(|i| [i / 2, i + 50, i + 120, 255]).collect();
        let params = ParameterSet::auto(15.0);
        let mut trig = TrigCache::new();
        let first = auto_correct(&mut trig, &pixels, 10, 10, &params).unwrap();
        let second = auto_correct(&mut TrigCache::new(), &pixels, 10, 10, &params).unwrap();
        assert_eq!(first, second);
    }
}
