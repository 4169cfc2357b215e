//! Parameter set driving the matrix computation, and its cache key.
//!
//! `ParameterSet` is a snapshot of every knob the caller exposes. Only the
//! knobs that influence the active mode's matrix take part in the cache key.

use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};
use crate::grading::hue_shift;
use crate::grading::tone::{NEUTRAL_KELVIN, NEUTRAL_PERCENT, ToneSettings};

/// Which builder produces the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMode {
    /// Multipliers plus a hue shear.
    #[default]
    Manual,
    /// Histogram-driven correction tuned by depth.
    Auto,
}

/// Every knob that determines a transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub mode: CorrectionMode,
    /// Shooting depth. Only read in auto mode. Must be non-negative.
    pub depth: f64,
    /// Hue knob. Starting rotation (degrees, rounded) for the auto search;
    /// shear angle for the manual matrix.
    pub hue: f64,
    /// Contrast in percent. 100 = neutral.
    pub contrast: f64,
    /// Brightness in percent. 100 = neutral.
    pub brightness: f64,
    /// White balance in Kelvin. 6500 = neutral.
    pub white_balance: f64,
    /// Saturation in percent. 100 = neutral.
    pub saturation: f64,
    pub red_multiplier: f64,
    pub green_multiplier: f64,
    pub blue_multiplier: f64,
    /// Boost on the blue contribution to the red output in auto mode.
    pub blue_magic: f64,
    /// Divides the pixel count into the near-empty bucket threshold.
    pub threshold_ratio: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            mode: CorrectionMode::Manual,
            depth: 20.0,
            hue: 0.0,
            contrast: NEUTRAL_PERCENT,
            brightness: NEUTRAL_PERCENT,
            white_balance: NEUTRAL_KELVIN,
            saturation: NEUTRAL_PERCENT,
            red_multiplier: 1.0,
            green_multiplier: 1.0,
            blue_multiplier: 1.0,
            blue_magic: 1.2,
            threshold_ratio: 2000.0,
        }
    }
}

/// Canonical form of the knobs a mode's matrix depends on.
#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
enum CacheKey {
    Auto {
        depth: f64,
        hue: i32,
        red: f64,
        green: f64,
        blue: f64,
        blue_magic: f64,
        threshold_ratio: f64,
    },
    Manual {
        red: f64,
        green: f64,
        blue: f64,
        hue: f64,
    },
}

impl ParameterSet {
    /// Default knobs in auto mode.
    pub fn auto(depth: f64) -> Self {
        Self {
            mode: CorrectionMode::Auto,
            depth,
            ..Self::default()
        }
    }

    /// Default knobs in manual mode with the given multipliers and hue.
    pub fn manual(red: f64, green: f64, blue: f64, hue: f64) -> Self {
        Self {
            mode: CorrectionMode::Manual,
            hue,
            red_multiplier: red,
            green_multiplier: green,
            blue_multiplier: blue,
            ..Self::default()
        }
    }

    pub fn is_auto(&self) -> bool {
        self.mode == CorrectionMode::Auto
    }

    /// `[red, green, blue]` multipliers.
    pub fn multipliers(&self) -> [f64; 3] {
        [self.red_multiplier, self.green_multiplier, self.blue_multiplier]
    }

    pub fn tone(&self) -> ToneSettings {
        ToneSettings {
            contrast: self.contrast,
            white_balance: self.white_balance,
            saturation: self.saturation,
        }
    }

    /// Starting rotation for the hue-shift search, in whole degrees within `(-180, 180]`.
    pub fn base_hue_degrees(&self) -> i32 {
        hue_shift::wrap_degrees(self.hue.rem_euclid(360.0).round() as i32)
    }

    /// Reject knobs the builders cannot work with.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("depth", self.depth),
            ("hue", self.hue),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("white_balance", self.white_balance),
            ("saturation", self.saturation),
            ("red_multiplier", self.red_multiplier),
            ("green_multiplier", self.green_multiplier),
            ("blue_multiplier", self.blue_multiplier),
            ("blue_magic", self.blue_magic),
            ("threshold_ratio", self.threshold_ratio),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(CorrectionError::ParameterOutOfRange { name, value });
            }
        }

        let non_negative = [
            ("depth", self.depth),
            ("brightness", self.brightness),
            ("red_multiplier", self.red_multiplier),
            ("green_multiplier", self.green_multiplier),
            ("blue_multiplier", self.blue_multiplier),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(CorrectionError::ParameterOutOfRange { name, value });
            }
        }

        if self.threshold_ratio <= 0.0 {
            return Err(CorrectionError::ParameterOutOfRange {
                name: "threshold_ratio",
                value: self.threshold_ratio,
            });
        }

        Ok(())
    }

    /// Deterministic cache key for the active mode.
    ///
    /// Auto keys hold every knob the auto matrix reads: depth, starting hue,
    /// multipliers, blue magic and threshold ratio. The tone knobs only shape
    /// the diagnostic coarse pass and are left out. Manual keys hold the
    /// multipliers and the hue.
    pub fn cache_key(&self) -> Result<String> {
        let key = match self.mode {
            CorrectionMode::Auto => CacheKey::Auto {
                depth: self.depth,
                hue: self.base_hue_degrees(),
                red: self.red_multiplier,
                green: self.green_multiplier,
                blue: self.blue_multiplier,
                blue_magic: self.blue_magic,
                threshold_ratio: self.threshold_ratio,
            },
            CorrectionMode::Manual => CacheKey::Manual {
                red: self.red_multiplier,
                green: self.green_multiplier,
                blue: self.blue_multiplier,
                hue: self.hue,
            },
        };
        Ok(serde_json::to_string(&key)?)
    }
}
