//! Correction math — hue shift search, contrast stretch, tone knobs, presets.

pub mod auto_correct;
pub mod hue_shift;
pub mod normalize;
pub mod presets;
pub mod tone;
