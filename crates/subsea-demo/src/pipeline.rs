//! Per-frame correction: the session's matrix or a fixed affine matrix,
//! optionally followed by a baked-in multiplier preset.

use subsea_core::grading::presets::Preset;
use subsea_core::{ColorMatrix, CorrectionSession, frame};

use crate::error::DemoError;
use crate::image_loader::RgbaFrame;

/// What happens to each frame.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// Applied with [`ColorMatrix::apply_affine`] instead of the session.
    pub fixed: Option<ColorMatrix>,
    /// Multiplied into the pixels after correction.
    pub baked: Option<&'static Preset>,
}

impl Pipeline {
    /// Correct `frame` in place and return the matrix that was applied.
    pub fn correct(
        &self,
        session: &mut CorrectionSession,
        frame: &mut RgbaFrame,
    ) -> Result<ColorMatrix, DemoError> {
        let matrix = match &self.fixed {
            Some(fixed) => {
                frame::pixel_count(&frame.pixels, frame.width, frame.height)?;
                fixed.apply_affine(&mut frame.pixels);
                *fixed
            }
            None => session.process_frame(&mut frame.pixels, frame.width, frame.height)?,
        };

        if let Some(preset) = self.baked {
            preset.apply(&mut frame.pixels);
            tracing::trace!(preset = preset.name, "preset baked into frame");
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use subsea_core::grading::presets::{self, UNDERWATER_REFERENCE};
    use subsea_core::{CorrectionError, ParameterSet};

    use super::*;

    fn gray(width: u32, height: u32) -> RgbaFrame {
        RgbaFrame {
            width,
            height,
            pixels: [100, 100, 100, 255].repeat((width * height) as usize),
        }
    }

    #[test]
    fn test_default_uses_the_session() {
        let mut session = CorrectionSession::new(ParameterSet::manual(1.2, 1.0, 1.0, 0.0));
        let mut frame = gray(2, 2);
        let matrix = Pipeline::default().correct(&mut session, &mut frame).unwrap();
        assert_eq!(matrix.get(0, 0), 1.2);
        // the red multiplier sits on the diagonal and scales the output again
        assert_eq!(&frame.pixels[..4], &[144, 100, 100, 255]);
        assert!(session.smoother().current().is_some());
    }

    #[test]
    fn test_reference_matrix_bypasses_the_session() {
        let mut session = CorrectionSession::default();
        let mut frame = gray(1, 1);
        let pipeline = Pipeline {
            fixed: Some(UNDERWATER_REFERENCE),
            baked: None,
        };
        let matrix = pipeline.correct(&mut session, &mut frame).unwrap();
        assert_eq!(matrix, UNDERWATER_REFERENCE);
        assert_eq!(frame.pixels, vec![158, 123, 144, 255]);
        assert!(session.smoother().current().is_none());
    }

    #[test]
    fn test_fixed_matrix_checks_frame_size() {
        let mut session = CorrectionSession::default();
        let mut frame = RgbaFrame {
            width: 3,
            height: 3,
            pixels: vec![0; 8],
        };
        let pipeline = Pipeline {
            fixed: Some(UNDERWATER_REFERENCE),
            baked: None,
        };
        let result = pipeline.correct(&mut session, &mut frame);
        assert!(matches!(
            result,
            Err(DemoError::Correction(CorrectionError::InvalidBuffer { .. }))
        ));
        assert_eq!(frame.pixels, vec![0; 8]);
    }

    #[test]
    fn test_baked_preset_scales_after_correction() {
        let mut session = CorrectionSession::default();
        let mut frame = gray(1, 1);
        let pipeline = Pipeline {
            fixed: None,
            baked: presets::find("warm-green"),
        };
        pipeline.correct(&mut session, &mut frame).unwrap();
        assert_eq!(frame.pixels, vec![100, 120, 100, 255]);
    }
}
