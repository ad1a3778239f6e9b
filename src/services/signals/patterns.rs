//! Chart pattern heuristics.
//!
//! These are coarse approximations over the trailing bars, not reliable
//! pattern recognition. Results are reported alongside a signal but do
//! not feed the evidence count.

use crate::config::PatternParams;
use crate::types::{Bar, PatternFlags, PatternTag};

/// Flags head-and-shoulders, double top/bottom and triangles.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    params: PatternParams,
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(PatternParams::default())
    }
}

impl PatternDetector {
    pub fn new(params: PatternParams) -> Self {
        Self { params }
    }

    /// Detect patterns over the trailing bars.
    ///
    /// The full catalog needs `min_window` bars; from `degraded_window`
    /// bars only head-and-shoulders and triangles are checked. Shorter
    /// series report nothing.
    pub fn detect(&self, bars: &[Bar]) -> PatternFlags {
        let mut flags = PatternFlags::default();
        if bars.len() < self.params.degraded_window {
            return flags;
        }

        flags.head_and_shoulders = self.head_and_shoulders(bars);
        flags.triangle = self.triangle(bars);

        if bars.len() >= self.params.min_window {
            flags.double_top = self.double_top(bars);
            flags.double_bottom = self.double_bottom(bars);
        }

        flags
    }

    fn head_and_shoulders(&self, bars: &[Bar]) -> PatternTag {
        let recent = tail(bars, self.params.head_shoulders_window);
        if recent.len() < 3 {
            return PatternTag::None;
        }

        // Three largest highs, earliest first on ties, then put back in time order.
        let mut ranked: Vec<usize> = (0..recent.len()).collect();
        ranked.sort_by(|&a, &b| recent[b].high.total_cmp(&recent[a].high).then(a.cmp(&b)));
        let mut peaks: Vec<usize> = ranked.into_iter().take(3).collect();
        peaks.sort_unstable();

        let (left, head, right) = (
            recent[peaks[0]].high,
            recent[peaks[1]].high,
            recent[peaks[2]].high,
        );
        if head > left && head > right {
            PatternTag::Bearish
        } else {
            PatternTag::None
        }
    }

    fn double_top(&self, bars: &[Bar]) -> PatternTag {
        let mut highs: Vec<f64> = tail(bars, self.params.double_window).iter().map(|b| b.high).collect();
        if highs.len() < 2 {
            return PatternTag::None;
        }
        highs.sort_by(|a, b| b.total_cmp(a));

        let (max, second) = (highs[0], highs[1]);
        if (max - second).abs() / max < self.params.double_tolerance {
            PatternTag::Bearish
        } else {
            PatternTag::None
        }
    }

    fn double_bottom(&self, bars: &[Bar]) -> PatternTag {
        let mut lows: Vec<f64> = tail(bars, self.params.double_window).iter().map(|b| b.low).collect();
        if lows.len() < 2 {
            return PatternTag::None;
        }
        lows.sort_by(|a, b| a.total_cmp(b));

        let (min, second) = (lows[0], lows[1]);
        if (min - second).abs() / min < self.params.double_tolerance {
            PatternTag::Bullish
        } else {
            PatternTag::None
        }
    }

    fn triangle(&self, bars: &[Bar]) -> PatternTag {
        let recent = tail(bars, self.params.triangle_window);
        let highs: Vec<f64> = recent.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = recent.iter().map(|b| b.low).collect();
        let (Some(high_slope), Some(low_slope)) = (linear_slope(&highs), linear_slope(&lows)) else {
            return PatternTag::None;
        };

        let threshold = self.params.triangle_slope;
        if high_slope.abs() < threshold && low_slope > threshold {
            PatternTag::Ascending
        } else if high_slope < -threshold && low_slope.abs() < threshold {
            PatternTag::Descending
        } else if high_slope < -threshold && low_slope > threshold {
            PatternTag::Symmetrical
        } else {
            PatternTag::None
        }
    }
}

fn tail(bars: &[Bar], window: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(window)..]
}

/// Least-squares slope of `values` against their index.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n_f;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }

    Some(covariance / variance)
}
