//! Frame statistics feeding the automatic correction.

pub mod histogram;

pub use histogram::{AverageColor, Channel, Histogram};
