//! Per-channel histograms and the average color of a frame.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::{self, CHANNELS, MAX_CHANNEL_VALUE};
use crate::grading::hue_shift::TrigCache;
use crate::grading::tone::ToneSettings;

/// Number of buckets per channel.
pub const BUCKETS: usize = 256;

/// RGB channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// Population counts for the R, G, B channels (256 bins each).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin counts for `[R, G, B]`. Each `Vec` has 256 entries.
    pub bins: [Vec<u32>; 3],
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            bins: [vec![0; BUCKETS], vec![0; BUCKETS], vec![0; BUCKETS]],
        }
    }

    /// Count one sample per channel.
    pub fn record(&mut self, rgb: [u8; 3]) {
        for (bins, value) in self.bins.iter_mut().zip(rgb) {
            bins[value as usize] += 1;
        }
    }

    pub fn channel(&self, channel: Channel) -> &[u32] {
        &self.bins[channel.index()]
    }

    /// Sum of all bins for one channel.
    pub fn total(&self, channel: Channel) -> u64 {
        self.channel(channel).iter().map(|&n| u64::from(n)).sum()
    }

    /// Number of non-empty bins in one channel.
    pub fn populated(&self, channel: Channel) -> usize {
        self.channel(channel).iter().filter(|&&n| n > 0).count()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean R, G, B over a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AverageColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl AverageColor {
    pub fn rgb(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Compute the raw per-channel histogram and the average color in one pass.
///
/// The buffer is only read.
pub fn analyze(pixels: &[u8], width: u32, height: u32) -> Result<(Histogram, AverageColor)> {
    let count = frame::pixel_count(pixels, width, height)?;

    let mut histogram = Histogram::new();
    let mut sum = [0.0_f64; 3];
    for px in pixels.chunks_exact(CHANNELS) {
        sum[0] += f64::from(px[0]);
        sum[1] += f64::from(px[1]);
        sum[2] += f64::from(px[2]);
        histogram.record([px[0], px[1], px[2]]);
    }

    Ok((histogram, mean(sum, count)))
}

/// Average color of a frame without building a histogram.
pub fn average_color(pixels: &[u8], width: u32, height: u32) -> Result<AverageColor> {
    let count = frame::pixel_count(pixels, width, height)?;

    let mut sum = [0.0_f64; 3];
    for px in pixels.chunks_exact(CHANNELS) {
        sum[0] += f64::from(px[0]);
        sum[1] += f64::from(px[1]);
        sum[2] += f64::from(px[2]);
    }

    Ok(mean(sum, count))
}

fn mean(sum: [f64; 3], count: usize) -> AverageColor {
    let n = count as f64;
    AverageColor {
        r: sum[0] / n,
        g: sum[1] / n,
        b: sum[2] / n,
    }
}

/// Histogram of the frame after replacing red with the hue-rotated energy.
///
/// Each pixel's red sample becomes `r' + g' + b'` of the rotated color,
/// clamped to `[0, 255]` and truncated. Green and blue are counted as-is.
/// This is the histogram the contrast stretch is derived from.
pub fn rotated_histogram(pixels: &[u8], trig: &mut TrigCache, degrees: i32) -> Histogram {
    let mut histogram = Histogram::new();
    for px in pixels.chunks_exact(CHANNELS) {
        let rotated = trig.rotate([f64::from(px[0]), f64::from(px[1]), f64::from(px[2])], degrees);
        let red = rotated.iter().sum::<f64>().clamp(0.0, MAX_CHANNEL_VALUE) as u8;
        histogram.record([red, px[1], px[2]]);
    }
    histogram
}

/// Histogram of the frame with the rotated red energy and the tone knobs applied.
///
/// Built at the starting hue before the shift search runs. It only describes
/// the frame for diagnostics and never feeds the stretch.
pub fn coarse_histogram(
    pixels: &[u8],
    trig: &mut TrigCache,
    degrees: i32,
    tone: &ToneSettings,
) -> Histogram {
    let mut histogram = Histogram::new();
    for px in pixels.chunks_exact(CHANNELS) {
        let rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];
        let rotated = trig.rotate(rgb, degrees);
        let toned = tone.apply([rotated.iter().sum::<f64>(), rgb[1], rgb[2]]);
        histogram.record(toned.map(frame::clamp_channel));
    }
    histogram
}
