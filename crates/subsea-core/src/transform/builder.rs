//! Matrix builders for auto and manual modes.

use crate::grading::hue_shift::TrigCache;
use crate::grading::normalize::ChannelStretch;
use crate::matrix::{COLUMNS, ColorMatrix};

/// Assemble the auto-mode matrix.
///
/// Each channel gets its stretch gain on the diagonal and its offset in the
/// constant column. The red row is replaced by the unit vector `(1, 1, 1)`
/// rotated by `hue_shift`, scaled by the red gain, with the blue term
/// boosted by `blue_magic`:
///
/// ```text
/// [ u_r·g_r  u_g·g_r  u_b·g_r·magic  0  o_r ]
/// [ 0        g_g      0              0  o_g ]
/// [ 0        0        g_b            0  o_b ]
/// [ 0        0        0              1  0   ]
/// ```
///
/// Finally every output row is scaled by its channel multiplier, so manual
/// multipliers compose with the automatic correction.
pub fn build_auto(
    trig: &mut TrigCache,
    stretch: &ChannelStretch,
    hue_shift: i32,
    blue_magic: f64,
    multipliers: [f64; 3],
) -> ColorMatrix {
    let unit = trig.rotate([1.0, 1.0, 1.0], hue_shift);
    let (red_gain, red_offset) = stretch.red.gain_offset();
    let (green_gain, green_offset) = stretch.green.gain_offset();
    let (blue_gain, blue_offset) = stretch.blue.gain_offset();

    #[rustfmt::skip]
    let mut matrix = ColorMatrix([
        unit[0] * red_gain, unit[1] * red_gain, unit[2] * red_gain * blue_magic, 0.0, red_offset,
        0.0, green_gain, 0.0, 0.0, green_offset,
        0.0, 0.0, blue_gain, 0.0, blue_offset,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);
    for (row, factor) in multipliers.into_iter().enumerate() {
        matrix.scale_row(row, factor);
    }
    matrix
}

/// Assemble the manual-mode matrix.
///
/// The diagonal carries the multipliers. The hue knob tilts the red output
/// toward green and blue with a shear, `sin(hue)` with `hue` taken as a raw
/// angle in radians. This is not a luma-preserving rotation.
pub fn build_manual(red: f64, green: f64, blue: f64, hue: f64) -> ColorMatrix {
    let tilt = hue.sin();

    let mut matrix = ColorMatrix::IDENTITY;
    matrix.0[0] = red;
    matrix.0[COLUMNS + 1] = green;
    matrix.0[2 * COLUMNS + 2] = blue;
    matrix.0[1] = green * tilt;
    matrix.0[2] = blue * tilt;
    matrix
}
