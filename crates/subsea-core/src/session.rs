//! Per-playback correction session.
//!
//! A session owns every piece of state the pipeline keeps between frames:
//! the trigonometric cache, the matrix cache and the smoother. Independent
//! sessions never share state. A session is single-threaded; wrap it in a
//! lock if frames arrive from several threads.

use crate::cache::{CacheHit, MatrixCache};
use crate::error::Result;
use crate::frame;
use crate::grading::auto_correct::auto_correct;
use crate::grading::hue_shift::TrigCache;
use crate::grading::tone;
use crate::matrix::ColorMatrix;
use crate::smoothing::TemporalSmoother;
use crate::transform::builder;
use crate::transform::params::{CorrectionMode, ParameterSet};

#[derive(Debug, Default)]
pub struct CorrectionSession {
    params: ParameterSet,
    trig: TrigCache,
    cache: MatrixCache,
    smoother: TemporalSmoother,
}

impl CorrectionSession {
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Replace the parameter snapshot used by subsequent frames.
    pub fn set_params(&mut self, params: ParameterSet) {
        self.params = params;
    }

    /// Switch between auto and manual matrix computation.
    pub fn set_auto_mode(&mut self, auto: bool) {
        self.params.mode = if auto {
            CorrectionMode::Auto
        } else {
            CorrectionMode::Manual
        };
        tracing::debug!(auto, "correction mode changed");
    }

    pub fn cache(&self) -> &MatrixCache {
        &self.cache
    }

    pub fn smoother(&self) -> &TemporalSmoother {
        &self.smoother
    }

    pub fn trig_cache(&self) -> &TrigCache {
        &self.trig
    }

    /// Raw (unsmoothed) matrix for a frame, served from the cache when possible.
    pub fn get_matrix(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<ColorMatrix> {
        self.get_matrix_traced(pixels, width, height).map(|(matrix, _)| matrix)
    }

    /// Like [`Self::get_matrix`], also reporting where the matrix came from.
    pub fn get_matrix_traced(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(ColorMatrix, CacheHit)> {
        self.params.validate()?;
        frame::pixel_count(pixels, width, height)?;

        let key = self.params.cache_key()?;
        let Self {
            params, trig, cache, ..
        } = self;
        cache.get_or_compute(key, || match params.mode {
            CorrectionMode::Auto => auto_correct(trig, pixels, width, height, params),
            CorrectionMode::Manual => Ok(builder::build_manual(
                params.red_multiplier,
                params.green_multiplier,
                params.blue_multiplier,
                params.hue,
            )),
        })
    }

    /// Feed a raw matrix through the session's smoother.
    pub fn smooth(&mut self, raw: &ColorMatrix) -> ColorMatrix {
        self.smoother.smooth(raw)
    }

    /// Smoothed matrix for a frame. Never fails.
    ///
    /// When the frame cannot be processed the error is logged and the last
    /// smoothed matrix (or identity, before the first frame) is returned
    /// without advancing the smoother.
    pub fn frame_matrix(&mut self, pixels: &[u8], width: u32, height: u32) -> ColorMatrix {
        match self.get_matrix(pixels, width, height) {
            Ok(raw) => self.smoother.smooth(&raw),
            Err(err) => {
                tracing::warn!("frame skipped, reusing previous matrix: {err}");
                self.smoother.current().copied().unwrap_or_default()
            }
        }
    }

    /// Correct one frame in place and return the matrix that was applied.
    ///
    /// The buffer is validated before anything is written. In auto mode the
    /// brightness knob scales the frame after analysis and before the matrix
    /// is applied.
    pub fn process_frame(&mut self, pixels: &mut [u8], width: u32, height: u32) -> Result<ColorMatrix> {
        self.params.validate()?;
        frame::pixel_count(pixels, width, height)?;

        let matrix = self.frame_matrix(pixels, width, height);
        if self.params.is_auto() {
            tone::apply_brightness(pixels, self.params.brightness);
        }
        matrix.apply_to_pixels(pixels, self.params.multipliers());
        Ok(matrix)
    }

    /// Reset hook for newly loaded media.
    ///
    /// Restarts smoothing and clears the previous-key slot. Persistent cache
    /// entries survive.
    pub fn on_new_media(&mut self) {
        self.smoother.reset();
        self.cache.clear_last();
        tracing::debug!(cached = self.cache.len(), "new media loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorrectionError;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.repeat((width * height) as usize)
    }

    #[test]
    fn test_get_matrix_uses_fast_path_for_unchanged_params() {
        let pixels = solid(4, 4, [30, 90, 160, 255]);
        let mut session = CorrectionSession::new(ParameterSet::auto(20.0));
        let (first, hit) = session.get_matrix_traced(&pixels, 4, 4).unwrap();
        assert_eq!(hit, CacheHit::Computed);
        let (second, hit) = session.get_matrix_traced(&pixels, 4, 4).unwrap();
        assert_eq!(hit, CacheHit::Last);
        assert_eq!(first, second);
    }

    #[test]
    fn test_toggle_switches_builder() {
        let pixels = solid(4, 4, [30, 90, 160, 255]);
        let mut session = CorrectionSession::default();
        assert_eq!(session.get_matrix(&pixels, 4, 4).unwrap(), ColorMatrix::IDENTITY);
        session.set_auto_mode(true);
        assert_ne!(session.get_matrix(&pixels, 4, 4).unwrap(), ColorMatrix::IDENTITY);
        session.set_auto_mode(false);
        let (m, hit) = session.get_matrix_traced(&pixels, 4, 4).unwrap();
        assert_eq!(m, ColorMatrix::IDENTITY);
        assert_eq!(hit, CacheHit::Stored);
    }

    #[test]
    fn test_invalid_buffer_fails_before_cache() {
        let mut session = CorrectionSession::default();
        let result = session.get_matrix(&[0; 5], 1, 1);
        assert!(matches!(result, Err(CorrectionError::InvalidBuffer { .. })));
        assert!(session.cache().is_empty());
    }

    #[test]
    fn test_frame_matrix_falls_back_to_previous() {
        let pixels = solid(2, 2, [10, 20, 30, 255]);
        let mut session = CorrectionSession::new(ParameterSet::manual(1.5, 1.0, 1.0, 0.0));
        let good = session.frame_matrix(&pixels, 2, 2);
        let alpha = session.smoother().alpha();

        let fallback = session.frame_matrix(&pixels[..3], 2, 2);
        assert_eq!(fallback, good);
        assert_eq!(session.smoother().alpha(), alpha);
    }

    #[test]
    fn test_frame_matrix_falls_back_to_identity_before_first_frame() {
        let mut session = CorrectionSession::default();
        assert_eq!(session.frame_matrix(&[1, 2, 3], 1, 1), ColorMatrix::IDENTITY);
    }

    #[test]
    fn test_process_frame_rejects_bad_buffer_without_mutation() {
        let mut session = CorrectionSession::new(ParameterSet::manual(2.0, 2.0, 2.0, 0.0));
        let mut pixels = vec![10u8; 7];
        assert!(session.process_frame(&mut pixels, 1, 2).is_err());
        assert_eq!(pixels, vec![10u8; 7]);
    }

    #[test]
    fn test_process_frame_applies_brightness_in_auto_mode() {
        let params = ParameterSet {
            brightness: 50.0,
            ..ParameterSet::auto(20.0)
        };
        let mut dimmed = solid(2, 2, [120, 120, 120, 255]);
        let mut session = CorrectionSession::new(params.clone());
        let matrix = session.process_frame(&mut dimmed, 2, 2).unwrap();

        let mut expected = solid(2, 2, [60, 60, 60, 255]);
        matrix.apply_to_pixels(&mut expected, params.multipliers());
        assert_eq!(dimmed, expected);
    }

    #[test]
    fn test_on_new_media_restarts_smoothing_and_keeps_entries() {
        let pixels = solid(2, 2, [10, 20, 30, 255]);
        let mut session = CorrectionSession::new(ParameterSet::auto(5.0));
        for _ in 0..4 {
            session.frame_matrix(&pixels, 2, 2);
        }
        session.on_new_media();
        assert_eq!(session.smoother().alpha(), 0.9);
        assert!(session.smoother().current().is_none());
        assert_eq!(session.cache().len(), 1);
        let (_, hit) = session.get_matrix_traced(&pixels, 2, 2).unwrap();
        assert_eq!(hit, CacheHit::Stored);
    }
}
