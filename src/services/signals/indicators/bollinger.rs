//! Bollinger Bands indicator.

use crate::services::signals::Indicator;
use crate::types::Bar;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(period)
/// - Upper band: SMA + k * StdDev
/// - Lower band: SMA - k * StdDev
///
/// Close above the upper band or below the lower band is a breakout; a
/// narrow band width is a squeeze (low volatility, potential breakout).
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

/// Aligned Bollinger columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    /// (upper - lower) / middle * 100.
    pub width: Vec<Option<f64>>,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerSeries;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> BollingerSeries {
        let n = bars.len();
        let mut series = BollingerSeries {
            upper: vec![None; n],
            middle: vec![None; n],
            lower: vec![None; n],
            width: vec![None; n],
        };
        if self.period == 0 || n < self.period {
            return series;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        for i in (self.period - 1)..n {
            let window = &closes[i + 1 - self.period..=i];
            let middle = window.iter().sum::<f64>() / self.period as f64;
            let std_dev = Self::std_dev(window, middle);

            let upper = middle + self.std_dev_multiplier * std_dev;
            let lower = middle - self.std_dev_multiplier * std_dev;

            series.upper[i] = Some(upper);
            series.middle[i] = Some(middle);
            series.lower[i] = Some(lower);
            series.width[i] = if middle != 0.0 {
                Some((upper - lower) / middle * 100.0)
            } else {
                None
            };
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(1_000_000 + i as i64 * 60_000, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_bollinger_flat_series_zero_width() {
        let series = BollingerBands::default().calculate(&create_bars(&[50.0; 25]));
        assert_eq!(series.middle[24], Some(50.0));
        assert_eq!(series.upper[24], Some(50.0));
        assert_eq!(series.lower[24], Some(50.0));
        assert_eq!(series.width[24], Some(0.0));
        assert!(series.width[18].is_none());
    }

    #[test]
    fn test_bollinger_known_values() {
        // mean 5, population std dev 2
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let series = BollingerBands::new(8, 2.0).calculate(&create_bars(&closes));
        assert_eq!(series.middle[7], Some(5.0));
        assert_eq!(series.upper[7], Some(9.0));
        assert_eq!(series.lower[7], Some(1.0));
        assert!((series.width[7].unwrap() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_bollinger_bands_ordered() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = BollingerBands::default().calculate(&create_bars(&closes));
        for i in 19..40 {
            let (u, m, l) = (series.upper[i].unwrap(), series.middle[i].unwrap(), series.lower[i].unwrap());
            assert!(u >= m && m >= l);
        }
    }
}
