//! Fixed channel-multiplier presets and a reference underwater matrix.

use crate::frame::{CHANNELS, MAX_CHANNEL_VALUE};
use crate::matrix::ColorMatrix;
use crate::transform::params::ParameterSet;

/// A named set of per-channel multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub multipliers: [f64; 3],
}

/// Built-in presets.
pub static PRESETS: [Preset; 3] = [
    Preset {
        name: "warm-red",
        multipliers: [1.2, 1.0, 1.0],
    },
    Preset {
        name: "warm-green",
        multipliers: [1.0, 1.2, 1.0],
    },
    Preset {
        name: "underwater",
        multipliers: [1.3, 1.1, 0.9],
    },
];

/// Hand-tuned correction for a typical shallow-water frame.
pub const UNDERWATER_REFERENCE: ColorMatrix = ColorMatrix([
    1.0851598274658527, 1.3146878916794824, -0.8160717942018385, 0.0, 0.0, //
    0.0, 1.2367149758454106, 0.0, 0.0, -0.23188405797101447, //
    0.0, 0.0, 1.4463276836158192, 0.0, -0.4406779661016949, //
    0.0, 0.0, 0.0, 1.0, 0.0, //
]);

/// Look up a preset by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Preset {
    /// Multiply R, G, B in place, capped at 255. Alpha is untouched.
    pub fn apply(&self, pixels: &mut [u8]) {
        for px in pixels.chunks_exact_mut(CHANNELS) {
            for (value, factor) in px[..3].iter_mut().zip(self.multipliers) {
                *value = (f64::from(*value) * factor).min(MAX_CHANNEL_VALUE) as u8;
            }
        }
    }

    /// Copy the multipliers into a parameter set.
    pub fn apply_to(&self, params: &mut ParameterSet) {
        [
            params.red_multiplier,
            params.green_multiplier,
            params.blue_multiplier,
        ] = self.multipliers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("Underwater").map(|p| p.multipliers), Some([1.3, 1.1, 0.9]));
        assert!(find("sepia").is_none());
    }

    #[test]
    fn test_underwater_preset_caps_and_keeps_alpha() {
        let mut pixels = vec![200, 100, 100, 42];
        find("underwater").unwrap().apply(&mut pixels);
        assert_eq!(pixels, vec![255, 110, 90, 42]);
    }

    #[test]
    fn test_apply_to_sets_multipliers() {
        let mut params = ParameterSet::default();
        find("warm-green").unwrap().apply_to(&mut params);
        assert_eq!(params.multipliers(), [1.0, 1.2, 1.0]);
    }

    #[test]
    fn test_reference_matrix_keeps_alpha() {
        assert!(UNDERWATER_REFERENCE.has_identity_alpha());
    }

    #[test]
    fn test_reference_matrix_lifts_gray() {
        let mut pixels = vec![100, 100, 100, 255];
        UNDERWATER_REFERENCE.apply_affine(&mut pixels);
        // R ≈ 158.38, G ≈ 123.67 − 0.23, B ≈ 144.63 − 0.44
        assert_eq!(pixels, vec![158, 123, 144, 255]);
    }
}
