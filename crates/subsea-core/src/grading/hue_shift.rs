//! Red-channel hue rotation and the depth-driven shift search.
//!
//! Water absorbs red first, so an underwater frame's average color sits far
//! below the red energy a surface photo would have. The search rotates the
//! average color one degree at a time until the rotated energy reaches a
//! floor that grows with depth, or until a depth-limited maximum rotation.

use std::collections::HashMap;

use crate::scopes::AverageColor;

/// Maximum shift at the surface, in degrees.
const MAX_SHIFT_AT_SURFACE: f64 = 120.0;
/// Exponential decay of the maximum shift per unit of depth.
const MAX_SHIFT_DECAY: f64 = 0.05;
/// Red energy floor at the surface.
const MIN_RED_ENERGY_AT_SURFACE: f64 = 60.0;
/// Exponential growth of the red energy floor per unit of depth.
const MIN_RED_ENERGY_GROWTH: f64 = 0.03;

/// Largest rotation the search may reach at `depth`.
///
/// ```text
/// max_shift = 120 · e^(−0.05 · depth)
/// ```
pub fn max_hue_shift(depth: f64) -> f64 {
    MAX_SHIFT_AT_SURFACE * (-MAX_SHIFT_DECAY * depth).exp()
}

/// Rotated red energy the search tries to reach at `depth`.
///
/// ```text
/// min_red_energy = 60 · e^(0.03 · depth)
/// ```
pub fn min_red_energy(depth: f64) -> f64 {
    MIN_RED_ENERGY_AT_SURFACE * (MIN_RED_ENERGY_GROWTH * depth).exp()
}

/// Degrees in a full turn.
const FULL_TURN: i32 = 360;

/// Wrap an angle into `(-180, 180]` degrees.
pub fn wrap_degrees(degrees: i32) -> i32 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    if wrapped > FULL_TURN / 2 {
        wrapped - FULL_TURN
    } else {
        wrapped
    }
}

/// Memoized `(cos, sin)` pairs per integer degree, at most 360 entries.
#[derive(Debug, Default, Clone)]
pub struct TrigCache {
    table: HashMap<i32, (f64, f64)>,
}

impl TrigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(U, W) = (cos θ, sin θ)` for `degrees`, computed once per degree of a turn.
    pub fn get(&mut self, degrees: i32) -> (f64, f64) {
        let turn = degrees.rem_euclid(FULL_TURN);
        *self.table.entry(turn).or_insert_with(|| {
            let rad = f64::from(turn).to_radians();
            (rad.cos(), rad.sin())
        })
    }

    /// Rotate `rgb` by `degrees` using the cached pair.
    pub fn rotate(&mut self, rgb: [f64; 3], degrees: i32) -> [f64; 3] {
        let (u, w) = self.get(degrees);
        rotate_with(rgb, u, w)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// NTSC luma-preserving hue rotation, one coefficient per channel.
///
/// ```text
/// r' = (0.299 + 0.701U + 0.168W) · r
/// g' = (0.587 − 0.587U + 0.330W) · g
/// b' = (0.114 − 0.114U − 0.497W) · b
/// ```
pub fn rotate_with(rgb: [f64; 3], u: f64, w: f64) -> [f64; 3] {
    [
        (0.299 + 0.701 * u + 0.168 * w) * rgb[0],
        (0.587 - 0.587 * u + 0.330 * w) * rgb[1],
        (0.114 - 0.114 * u - 0.497 * w) * rgb[2],
    ]
}

/// Uncached rotation for arbitrary (non-integer) angles.
pub fn rotate(rgb: [f64; 3], degrees: f64) -> [f64; 3] {
    let rad = degrees.to_radians();
    rotate_with(rgb, rad.cos(), rad.sin())
}

/// Find the rotation that lifts the average color's red energy to the depth floor.
///
/// Starting at `base` degrees (wrapped into `(-180, 180]`), the rotated
/// energy `r' + g' + b'` is evaluated and the shift advanced by one degree
/// per step. The loop stops once the energy reaches `min_red_energy(depth)`
/// or the shift exceeds `max_hue_shift(depth)`. The shift is advanced after every evaluation,
/// including the one that satisfies the floor. If the unrotated red average
/// already meets the floor, the wrapped `base` is returned. The search never
/// takes more than 302 steps.
pub fn find_hue_shift(trig: &mut TrigCache, avg: AverageColor, depth: f64, base: i32) -> i32 {
    let max_shift = max_hue_shift(depth);
    let floor = min_red_energy(depth);

    let base = wrap_degrees(base);
    let mut shift = base;
    let mut energy = avg.r;
    while energy < floor {
        energy = trig.rotate(avg.rgb(), shift).iter().sum();
        shift = shift.saturating_add(1);
        if f64::from(shift) > max_shift {
            energy = floor;
        }
    }

    tracing::trace!(depth, base, shift, max_shift, floor, "hue shift search finished");
    shift
}
