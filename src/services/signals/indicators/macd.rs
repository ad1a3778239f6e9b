//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::Ema;
use crate::services::signals::Indicator;
use crate::types::Bar;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// Buy signal: MACD crosses above signal line
/// Sell signal: MACD crosses below signal line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

/// Aligned MACD columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdSeries;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn calculate(&self, bars: &[Bar]) -> MacdSeries {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let fast_ema = Ema::rolling(&closes, self.fast_period);
        let slow_ema = Ema::rolling(&closes, self.slow_period);

        let macd: Vec<Option<f64>> = fast_ema
            .iter()
            .zip(&slow_ema)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        let signal = Ema::rolling_defined(&macd, self.signal_period);

        let histogram = macd
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_uptrend_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                Bar::new(1_000_000 + i as i64 * 60_000, base, base + 2.0, base - 1.0, base + 1.0, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_alignment() {
        let series = Macd::default().calculate(&create_uptrend_bars(60));
        assert_eq!(series.macd.len(), 60);
        assert!(series.macd[24].is_none());
        assert!(series.macd[25].is_some());
        assert!(series.signal[32].is_none());
        assert!(series.signal[33].is_some());
        assert!(series.histogram[33].is_some());
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let series = Macd::default().calculate(&create_uptrend_bars(60));
        assert!(series.macd[59].unwrap() > 0.0);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let series = Macd::default().calculate(&create_uptrend_bars(20));
        assert!(series.macd.iter().all(Option::is_none));
        assert!(series.signal.iter().all(Option::is_none));
    }
}
