//! Parameter definitions and matrix builders.

pub mod builder;
pub mod params;
