//! The 4×5 affine color matrix and its application to RGBA8 buffers.

use serde::{Deserialize, Serialize};

use crate::error::{CorrectionError, Result};
use crate::frame::{CHANNELS, MAX_CHANNEL_VALUE, clamp_channel};

/// Rows in a color matrix (output R, G, B, A).
pub const ROWS: usize = 4;
/// Columns in a color matrix (input R, G, B, A, constant).
pub const COLUMNS: usize = 5;
/// Index of the fixed alpha row.
pub const ALPHA_ROW: usize = 3;

/// Row-major 4×5 affine transform.
///
/// Columns are input R, G, B, A and a constant offset. The alpha row is
/// always `[0, 0, 0, 1, 0]`; construction and deserialization reject any
/// other alpha row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 20]")]
pub struct ColorMatrix(pub(crate) [f64; ROWS * COLUMNS]);

impl ColorMatrix {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0, //
    ]);

    const ALPHA_COEFFICIENTS: [f64; COLUMNS] = [0.0, 0.0, 0.0, 1.0, 0.0];

    /// Build a matrix from row-major coefficients.
    pub fn from_coefficients(coefficients: [f64; ROWS * COLUMNS]) -> Result<Self> {
        let matrix = Self(coefficients);
        if !matrix.has_identity_alpha() {
            return Err(CorrectionError::InvalidMatrix(
                "alpha row must be [0, 0, 0, 1, 0]".into(),
            ));
        }
        if let Some(value) = coefficients.iter().find(|v| !v.is_finite()) {
            return Err(CorrectionError::InvalidMatrix(format!(
                "coefficient {value} is not finite"
            )));
        }
        Ok(matrix)
    }

    /// Coefficient at `(row, column)`.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.0[row * COLUMNS + column]
    }

    /// Overwrite one color coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `row` is the alpha row or out of range.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        assert!(row < ALPHA_ROW, "alpha row is fixed");
        self.0[row * COLUMNS + column] = value;
    }

    pub fn coefficients(&self) -> &[f64; ROWS * COLUMNS] {
        &self.0
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.0[row * COLUMNS..(row + 1) * COLUMNS]
    }

    /// Whether the alpha row is still the identity row.
    pub fn has_identity_alpha(&self) -> bool {
        self.row(ALPHA_ROW) == Self::ALPHA_COEFFICIENTS
    }

    /// Restore the alpha row to `[0, 0, 0, 1, 0]`.
    pub(crate) fn reset_alpha_row(&mut self) {
        self.0[ALPHA_ROW * COLUMNS..].copy_from_slice(&Self::ALPHA_COEFFICIENTS);
    }

    /// Scale every coefficient of one color row, offset included.
    ///
    /// # Panics
    ///
    /// Panics if `row` is the alpha row or out of range.
    pub fn scale_row(&mut self, row: usize, factor: f64) {
        assert!(row < ALPHA_ROW, "alpha row is fixed");
        for value in &mut self.0[row * COLUMNS..(row + 1) * COLUMNS] {
            *value *= factor;
        }
    }

    /// Apply the matrix to an RGBA8 buffer in place, alpha untouched.
    ///
    /// The constant column is a fraction of full scale here. Only the diagonal
    /// green/blue terms and the full red row are used:
    ///
    /// ```text
    /// R' = clamp(R·m0 + G·m1 + B·m2 + m4·255)
    /// G' = clamp(G·m6 + m9·255)
    /// B' = clamp(B·m12 + m14·255)
    /// ```
    ///
    /// Each result is then scaled by its channel multiplier and clamped to
    /// `[0, 255]` again before being written back.
    pub fn apply_to_pixels(&self, pixels: &mut [u8], multipliers: [f64; 3]) {
        let m = &self.0;
        for px in pixels.chunks_exact_mut(CHANNELS) {
            let r = f64::from(px[0]);
            let g = f64::from(px[1]);
            let b = f64::from(px[2]);

            let red = clamp_unit(r * m[0] + g * m[1] + b * m[2] + m[4] * MAX_CHANNEL_VALUE);
            let green = clamp_unit(g * m[6] + m[9] * MAX_CHANNEL_VALUE);
            let blue = clamp_unit(b * m[12] + m[14] * MAX_CHANNEL_VALUE);

            px[0] = clamp_channel(red * multipliers[0]);
            px[1] = clamp_channel(green * multipliers[1]);
            px[2] = clamp_channel(blue * multipliers[2]);
        }
    }

    /// Apply the full R, G, B rows to an RGBA8 buffer in place.
    ///
    /// Meant for externally supplied matrices whose off-diagonal green and
    /// blue terms are populated. The constant column is added as-is, in
    /// channel units. Alpha is left untouched.
    ///
    /// ```text
    /// C' = clamp(R·m[c,0] + G·m[c,1] + B·m[c,2] + A·m[c,3] + m[c,4])
    /// ```
    pub fn apply_affine(&self, pixels: &mut [u8]) {
        for px in pixels.chunks_exact_mut(CHANNELS) {
            let input = [
                f64::from(px[0]),
                f64::from(px[1]),
                f64::from(px[2]),
                f64::from(px[3]),
            ];
            let mut out = [0u8; 3];
            for (row, slot) in out.iter_mut().enumerate() {
                let coeffs = self.row(row);
                let value = input
                    .iter()
                    .zip(coeffs)
                    .map(|(v, c)| v * c)
                    .sum::<f64>()
                    + coeffs[4];
                *slot = clamp_channel(value);
            }
            px[..3].copy_from_slice(&out);
        }
    }
}

impl TryFrom<[f64; ROWS * COLUMNS]> for ColorMatrix {
    type Error = CorrectionError;

    fn try_from(coefficients: [f64; ROWS * COLUMNS]) -> Result<Self> {
        Self::from_coefficients(coefficients)
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, MAX_CHANNEL_VALUE)
}
