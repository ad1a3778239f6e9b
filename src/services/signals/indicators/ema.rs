//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::Bar;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Seeded with the SMA
/// of the first `period` values.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// EMA of any series, aligned with the input.
    pub fn rolling(values: &[f64], period: usize) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if period == 0 || values.len() < period {
            return out;
        }

        let multiplier = 2.0 / (period as f64 + 1.0);

        // First EMA is SMA
        let mut ema = values.iter().take(period).sum::<f64>() / period as f64;
        out[period - 1] = Some(ema);

        for i in period..values.len() {
            ema = (values[i] - ema) * multiplier + ema;
            out[i] = Some(ema);
        }

        out
    }

    /// EMA over a series whose leading values may be undefined. The
    /// average starts at the first defined value.
    pub fn rolling_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
        let Some(start) = values.iter().position(Option::is_some) else {
            return vec![None; values.len()];
        };

        let tail: Vec<f64> = values[start..].iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        let mut out = vec![None; start];
        out.extend(
            Self::rolling(&tail, period)
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite())),
        );
        out
    }
}

impl Indicator for Ema {
    type Output = Vec<Option<f64>>;

    fn id(&self) -> &str {
        "ema"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Self::rolling(&closes, self.period)
    }
}
