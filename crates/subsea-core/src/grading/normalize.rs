//! Per-channel contrast stretch derived from near-empty histogram buckets.

use serde::{Deserialize, Serialize};

use crate::scopes::{Channel, Histogram};

/// A bucket is a stretch candidate when its population exceeds the
/// threshold level by less than this.
const NEAR_EMPTY_MARGIN: f64 = 2.0;

/// Full-scale span used for gain and offset.
const STRETCH_SPAN: f64 = 256.0;

/// Low/high bucket bounds of a channel's stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StretchBounds {
    pub low: u8,
    pub high: u8,
}

impl StretchBounds {
    /// No-op stretch.
    pub const FULL: Self = Self { low: 0, high: 255 };

    /// `(gain, offset)` remapping `[low, high]` onto the full range.
    ///
    /// ```text
    /// gain   = 256 / (high − low)
    /// offset = (−low / 256) · gain
    /// ```
    ///
    /// A collapsed interval falls back to unit gain and zero offset.
    pub fn gain_offset(&self) -> (f64, f64) {
        if self.high <= self.low {
            tracing::debug!(
                low = self.low,
                high = self.high,
                "collapsed stretch interval, using unit gain"
            );
            return (1.0, 0.0);
        }

        let gain = STRETCH_SPAN / f64::from(self.high - self.low);
        let offset = (-f64::from(self.low) / STRETCH_SPAN) * gain;
        (gain, offset)
    }
}

impl Default for StretchBounds {
    fn default() -> Self {
        Self::FULL
    }
}

/// Stretch bounds for all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelStretch {
    pub red: StretchBounds,
    pub green: StretchBounds,
    pub blue: StretchBounds,
}

impl ChannelStretch {
    pub fn get(&self, channel: Channel) -> StretchBounds {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

/// Per-bucket population threshold: `pixel_count / threshold_ratio`.
pub fn threshold_level(pixel_count: usize, threshold_ratio: f64) -> f64 {
    pixel_count as f64 / threshold_ratio
}

/// Sorted candidate indices for one channel, with 0 and 255 as sentinels.
///
/// A bucket qualifies when `count − threshold_level < 2`.
pub fn stretch_candidates(bins: &[u32], threshold_level: f64) -> Vec<u8> {
    let mut candidates = Vec::with_capacity(bins.len() + 2);
    candidates.push(0);
    candidates.extend(
        bins.iter()
            .zip(0..=u8::MAX)
            .filter(|&(&count, _)| f64::from(count) - threshold_level < NEAR_EMPTY_MARGIN)
            .map(|(_, index)| index),
    );
    candidates.push(u8::MAX);
    candidates
}

/// Widest gap between consecutive candidates. The first widest gap wins.
///
/// Returns [`StretchBounds::FULL`] when no positive gap exists.
pub fn normalizing_interval(candidates: &[u8]) -> StretchBounds {
    let mut best = StretchBounds::FULL;
    let mut max_gap = 0;
    for pair in candidates.windows(2) {
        let gap = pair[1].saturating_sub(pair[0]);
        if gap > max_gap {
            max_gap = gap;
            best = StretchBounds {
                low: pair[0],
                high: pair[1],
            };
        }
    }

    if max_gap == 0 {
        tracing::debug!("degenerate histogram, keeping full-range stretch");
    }
    best
}

/// Derive the stretch bounds of every channel from `histogram`.
pub fn normalize(histogram: &Histogram, threshold_level: f64) -> ChannelStretch {
    let bounds = Channel::ALL.map(|channel| {
        normalizing_interval(&stretch_candidates(histogram.channel(channel), threshold_level))
    });

    ChannelStretch {
        red: bounds[0],
        green: bounds[1],
        blue: bounds[2],
    }
}
