//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use bollinger::{BollingerBands, BollingerSeries};
pub use ema::Ema;
pub use levels::{Fibonacci, LevelSeries, SupportResistance};
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::{VolumeBaseline, VolumeSeries};

use super::{pct_change, Indicator};
use crate::config::IndicatorWindows;
use crate::types::{Bar, FibonacciLevels, IndicatorSnapshot};

/// Every derived column for one bar series, aligned by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorTable {
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub rsi: Vec<Option<f64>>,
    pub bollinger: BollingerSeries,
    pub volume_baseline: VolumeSeries,
    pub levels: LevelSeries,
    /// Close-to-close change in percent; undefined at index 0.
    pub price_change_pct: Vec<Option<f64>>,
    /// Retracements from the trailing window ending at the last bar.
    pub fibonacci: Option<FibonacciLevels>,
}

impl IndicatorTable {
    /// Calculate all indicators over `bars`.
    pub fn compute(bars: &[Bar], windows: &IndicatorWindows) -> Self {
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volume: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        // Trend indicators
        let sma_short = Sma::rolling(&close, windows.sma_short);
        let sma_long = Sma::rolling(&close, windows.sma_long);
        let ema_fast = Ema::rolling(&close, windows.ema_fast);
        let ema_slow = Ema::rolling(&close, windows.ema_slow);
        let macd = Macd::new(windows.ema_fast, windows.ema_slow, windows.macd_signal).calculate(bars);

        // Momentum indicators
        let rsi = Rsi::new(windows.rsi_period).calculate(bars);

        // Volatility indicators
        let bollinger =
            BollingerBands::new(windows.bollinger_period, windows.bollinger_std_dev).calculate(bars);

        // Volume indicators
        let volume_baseline = VolumeBaseline::new(windows.volume_period).calculate(bars);

        // Levels
        let levels = SupportResistance::new(windows.support_resistance_period).calculate(bars);
        let fibonacci = Fibonacci::new(windows.fibonacci_period).calculate(bars);

        let price_change_pct = (0..close.len())
            .map(|i| if i == 0 { None } else { pct_change(close[i - 1], close[i]) })
            .collect();

        Self {
            close,
            volume,
            sma_short,
            sma_long,
            ema_fast,
            ema_slow,
            macd,
            rsi,
            bollinger,
            volume_baseline,
            levels,
            price_change_pct,
            fibonacci,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Values at index `i`. Out-of-range indices give the empty snapshot.
    pub fn snapshot(&self, i: usize) -> IndicatorSnapshot {
        if i >= self.len() {
            return IndicatorSnapshot::default();
        }

        IndicatorSnapshot {
            close: self.close[i],
            volume: self.volume[i],
            sma_short: self.sma_short[i],
            sma_long: self.sma_long[i],
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            macd: self.macd.macd[i],
            macd_signal: self.macd.signal[i],
            macd_histogram: self.macd.histogram[i],
            rsi: self.rsi[i],
            bb_upper: self.bollinger.upper[i],
            bb_middle: self.bollinger.middle[i],
            bb_lower: self.bollinger.lower[i],
            bb_width: self.bollinger.width[i],
            volume_baseline: self.volume_baseline.baseline[i],
            volume_ratio: self.volume_baseline.ratio[i],
            support: self.levels.support[i],
            resistance: self.levels.resistance[i],
            price_change_pct: self.price_change_pct[i],
        }
    }

    /// Snapshot of the most recent bar.
    pub fn latest(&self) -> IndicatorSnapshot {
        self.snapshot(self.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_wave_bars(count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.1;
                Bar::new(
                    1_000_000 + i as i64 * 60_000,
                    close - 0.5,
                    close + 1.5,
                    close - 1.5,
                    close,
                    1000.0 + (i % 7) as f64 * 100.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_table_aligned_with_bars() {
        let bars = create_wave_bars(80);
        let table = IndicatorTable::compute(&bars, &IndicatorWindows::default());
        assert_eq!(table.len(), 80);
        assert_eq!(table.sma_long.len(), 80);
        assert_eq!(table.rsi.len(), 80);
        assert_eq!(table.bollinger.width.len(), 80);
        assert_eq!(table.levels.support.len(), 80);
        assert!(table.fibonacci.is_some());
    }

    #[test]
    fn test_latest_snapshot_fully_defined() {
        let table = IndicatorTable::compute(&create_wave_bars(80), &IndicatorWindows::default());
        let snap = table.latest();
        assert!(snap.sma_short.is_some());
        assert!(snap.sma_long.is_some());
        assert!(snap.macd_signal.is_some());
        assert!(snap.rsi.is_some());
        assert!(snap.bb_width.is_some());
        assert!(snap.volume_ratio.is_some());
        assert!(snap.support.is_some());
        assert!(snap.price_change_pct.is_some());
    }

    #[test]
    fn test_no_look_ahead_on_prefix() {
        let bars = create_wave_bars(80);
        let windows = IndicatorWindows::default();
        let full = IndicatorTable::compute(&bars, &windows);
        let prefix = IndicatorTable::compute(&bars[..60], &windows);
        for i in 0..60 {
            assert_eq!(full.snapshot(i), prefix.snapshot(i), "index {}", i);
        }
    }

    #[test]
    fn test_fibonacci_undefined_before_window() {
        let windows = IndicatorWindows::default();
        let short = IndicatorTable::compute(&create_wave_bars(5), &windows);
        assert!(short.fibonacci.is_none());

        let full = IndicatorTable::compute(&create_wave_bars(windows.fibonacci_period), &windows);
        assert!(full.fibonacci.is_some());
    }

    #[test]
    fn test_empty_series() {
        let table = IndicatorTable::compute(&[], &IndicatorWindows::default());
        assert!(table.is_empty());
        assert!(table.fibonacci.is_none());
        assert_eq!(table.latest(), IndicatorSnapshot::default());
    }
}
