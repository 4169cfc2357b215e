//! Frame-to-frame exponential smoothing of the correction matrix.

use crate::matrix::ColorMatrix;

/// Blend weight at the start of a session.
pub const INITIAL_ALPHA: f64 = 0.9;
/// Per-frame decay applied to the blend weight.
pub const ALPHA_DECAY: f64 = 0.95;
/// Lower bound of the blend weight.
pub const MIN_ALPHA: f64 = 0.1;

/// Exponentially blends consecutive matrices to suppress flicker.
///
/// The first matrix of a session passes through unchanged. Each later call
/// blends `state = α·raw + (1 − α)·state` coefficient-wise, then decays α by
/// 5% down to a floor of 0.1, so the correction settles as playback goes on.
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    state: Option<ColorMatrix>,
    alpha: f64,
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self {
            state: None,
            alpha: INITIAL_ALPHA,
        }
    }
}

impl TemporalSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smooth(&mut self, raw: &ColorMatrix) -> ColorMatrix {
        let Some(state) = self.state.as_mut() else {
            self.state = Some(*raw);
            return *raw;
        };

        let alpha = self.alpha;
        for (s, r) in state.0.iter_mut().zip(raw.0) {
            *s = alpha * r + (1.0 - alpha) * *s;
        }
        state.reset_alpha_row();

        self.alpha = (self.alpha * ALPHA_DECAY).max(MIN_ALPHA);
        *state
    }

    /// Current blend weight.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Last emitted matrix, if any.
    pub fn current(&self) -> Option<&ColorMatrix> {
        self.state.as_ref()
    }

    /// Start a new session: drop the state and restore the initial weight.
    pub fn reset(&mut self) {
        self.state = None;
        self.alpha = INITIAL_ALPHA;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn filled(value: f64) -> ColorMatrix {
        let mut m = ColorMatrix([value; 20]);
        m.reset_alpha_row();
        m
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut smoother = TemporalSmoother::new();
        let raw = filled(3.0);
        assert_eq!(smoother.smooth(&raw), raw);
        assert_eq!(smoother.alpha(), INITIAL_ALPHA);
    }

    #[test]
    fn test_second_frame_blends_with_initial_alpha() {
        let mut smoother = TemporalSmoother::new();
        smoother.smooth(&filled(1.0));
        let out = smoother.smooth(&filled(2.0));
        let expected = 0.9 * 2.0 + 0.1 * 1.0;
        assert!((out.get(0, 0) - expected).abs() < EPSILON);
        assert!((out.get(2, 4) - expected).abs() < EPSILON);
        assert!(out.has_identity_alpha());
    }

    #[test]
    fn test_alpha_decays_to_floor() {
        let mut smoother = TemporalSmoother::new();
        smoother.smooth(&filled(0.0));
        for blends in 1..=80 {
            smoother.smooth(&filled(f64::from(blends)));
            let expected = (INITIAL_ALPHA * ALPHA_DECAY.powi(blends)).max(MIN_ALPHA);
            assert!((smoother.alpha() - expected).abs() < 1e-9, "after {blends} blends");
        }
        assert_eq!(smoother.alpha(), MIN_ALPHA);
    }

    #[test]
    fn test_reset_restarts_session() {
        let mut smoother = TemporalSmoother::new();
        for i in 0..5 {
            smoother.smooth(&filled(f64::from(i)));
        }
        smoother.reset();
        assert_eq!(smoother.alpha(), INITIAL_ALPHA);
        assert!(smoother.current().is_none());
        let raw = filled(7.0);
        assert_eq!(smoother.smooth(&raw), raw);
    }
}
