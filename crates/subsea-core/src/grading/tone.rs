//! Slider-style tone adjustments: contrast, white balance, saturation, brightness.
//!
//! Values are in 8-bit scale (`0..=255`); knobs use the percentage and
//! Kelvin units of the parameter set.

use palette::{FromColor, Hsl, Srgb};
use serde::{Deserialize, Serialize};

use crate::frame::{CHANNELS, MAX_CHANNEL_VALUE};

/// Neutral contrast, saturation and brightness (percent).
pub const NEUTRAL_PERCENT: f64 = 100.0;
/// Neutral white balance (Kelvin).
pub const NEUTRAL_KELVIN: f64 = 6500.0;

/// Mid-gray pivot for contrast.
const CONTRAST_PIVOT: f64 = 128.0;

/// Tone knobs read by the coarse analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSettings {
    /// Contrast in percent. 100 = neutral.
    pub contrast: f64,
    /// White balance in Kelvin. 6500 = neutral.
    pub white_balance: f64,
    /// Saturation in percent. 100 = neutral.
    pub saturation: f64,
}

impl Default for ToneSettings {
    fn default() -> Self {
        Self {
            contrast: NEUTRAL_PERCENT,
            white_balance: NEUTRAL_KELVIN,
            saturation: NEUTRAL_PERCENT,
        }
    }
}

impl ToneSettings {
    /// Contrast, then white balance, then saturation.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let adjusted = rgb.map(|v| {
            adjust_white_balance(adjust_contrast(v, self.contrast), self.white_balance)
        });
        adjust_saturation(adjusted, self.saturation)
    }
}

/// Stretch a value away from mid-gray.
///
/// ```text
/// out = (in − 128) · contrast / 100 + 128
/// ```
pub fn adjust_contrast(value: f64, contrast: f64) -> f64 {
    (value - CONTRAST_PIVOT) * (contrast / NEUTRAL_PERCENT) + CONTRAST_PIVOT
}

/// Linear white balance gain around 6500 K.
///
/// ```text
/// out = in · (1 + (kelvin − 6500) / 6500)
/// ```
pub fn adjust_white_balance(value: f64, kelvin: f64) -> f64 {
    value * (1.0 + (kelvin - NEUTRAL_KELVIN) / NEUTRAL_KELVIN)
}

/// Scale HSL saturation by `saturation / 100`.
///
/// The result is rounded to whole 8-bit steps. Saturation above full scale
/// is capped.
pub fn adjust_saturation(rgb: [f64; 3], saturation: f64) -> [f64; 3] {
    let normalized = rgb.map(|v| v / MAX_CHANNEL_VALUE);
    let mut hsl = Hsl::<palette::encoding::Srgb, f64>::from_color(Srgb::<f64>::new(
        normalized[0],
        normalized[1],
        normalized[2],
    ));
    hsl.saturation = (hsl.saturation * (saturation / NEUTRAL_PERCENT)).clamp(0.0, 1.0);

    let out = Srgb::<f64>::from_color(hsl);
    [out.red, out.green, out.blue].map(|v| (v * MAX_CHANNEL_VALUE).round())
}

/// Scale R, G, B by `brightness / 100` in place, truncating. Alpha is untouched.
pub fn apply_brightness(pixels: &mut [u8], brightness: f64) {
    if (brightness - NEUTRAL_PERCENT).abs() < f64::EPSILON {
        return;
    }

    let factor = brightness / NEUTRAL_PERCENT;
    for px in pixels.chunks_exact_mut(CHANNELS) {
        for value in &mut px[..3] {
            *value = (f64::from(*value) * factor).clamp(0.0, MAX_CHANNEL_VALUE) as u8;
        }
    }
}
