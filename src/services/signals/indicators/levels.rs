//! Price levels: rolling support/resistance and Fibonacci retracements.

use crate::services::signals::Indicator;
use crate::types::{Bar, FibonacciLevels};

/// Rolling support (lowest low) and resistance (highest high).
pub struct SupportResistance {
    period: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSeries {
    pub support: Vec<Option<f64>>,
    pub resistance: Vec<Option<f64>>,
}

impl Default for SupportResistance {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl SupportResistance {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for SupportResistance {
    type Output = LevelSeries;

    fn id(&self) -> &str {
        "support_resistance"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> LevelSeries {
        let n = bars.len();
        let mut series = LevelSeries {
            support: vec![None; n],
            resistance: vec![None; n],
        };
        if self.period == 0 || n < self.period {
            return series;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            series.support[i] = Some(low);
            series.resistance[i] = Some(high);
        }

        series
    }
}

/// Fibonacci retracements over the most recent bars.
///
/// Not a rolling column: levels come from the swing high/low of the
/// trailing window ending at the last bar, recomputed on every call.
/// Undefined until the window is full.
pub struct Fibonacci {
    period: usize,
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl Fibonacci {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Fibonacci {
    type Output = Option<FibonacciLevels>;

    fn id(&self) -> &str {
        "fibonacci"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<FibonacciLevels> {
        if self.period == 0 || bars.len() < self.period {
            return None;
        }

        let recent = &bars[bars.len() - self.period..];
        let swing_high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let swing_low = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let diff = swing_high - swing_low;

        Some(FibonacciLevels {
            swing_high,
            swing_low,
            level_236: swing_high - diff * 0.236,
            level_382: swing_high - diff * 0.382,
            level_500: swing_high - diff * 0.5,
            level_618: swing_high - diff * 0.618,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: usize, high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(1_000_000 + i as i64 * 60_000, mid, high, low, mid, 1000.0)
    }

    #[test]
    fn test_support_resistance_trailing_window() {
        let bars: Vec<Bar> = [(10.0, 8.0), (12.0, 9.0), (11.0, 7.0), (9.0, 8.5)]
            .iter()
            .enumerate()
            .map(|(i, &(h, l))| bar(i, h, l))
            .collect();
        let series = SupportResistance::new(3).calculate(&bars);
        assert_eq!(series.support[1], None);
        assert_eq!(series.support[2], Some(7.0));
        assert_eq!(series.resistance[2], Some(12.0));
        assert_eq!(series.support[3], Some(7.0));
        assert_eq!(series.resistance[3], Some(12.0));
    }

    #[test]
    fn test_fibonacci_levels() {
        let bars: Vec<Bar> = (0..30).map(|i| bar(i, 100.0 + i as f64, 90.0 + i as f64)).collect();
        let fib = Fibonacci::default().calculate(&bars).unwrap();
        // Last 20 bars: indices 10..30
        assert_eq!(fib.swing_high, 129.0);
        assert_eq!(fib.swing_low, 100.0);
        assert!((fib.level_500 - 114.5).abs() < 1e-9);
        assert!(fib.level_236 > fib.level_382 && fib.level_382 > fib.level_618);
    }

    #[test]
    fn test_fibonacci_short_and_empty_series() {
        assert!(Fibonacci::default().calculate(&[]).is_none());
        assert!(Fibonacci::default().calculate(&[bar(0, 10.0, 5.0)]).is_none());

        let bars: Vec<Bar> = (0..20).map(|i| bar(i, 10.0 + i as f64, 5.0)).collect();
        assert!(Fibonacci::default().calculate(&bars[..19]).is_none());
        let fib = Fibonacci::default().calculate(&bars).unwrap();
        assert_eq!(fib.swing_high, 29.0);
        assert_eq!(fib.swing_low, 5.0);
    }

    #[test]
    fn test_fibonacci_min_periods() {
        assert_eq!(Fibonacci::new(20).min_periods(), 20);
    }
}
