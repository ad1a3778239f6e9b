use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// OHLCV (Open, High, Low, Close, Volume) bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp (milliseconds) of the bar open.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Time-ordered, validated sequence of bars. Index 0 is the oldest bar.
///
/// Once built the series is read-only; the engine only ever borrows it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, checking that timestamps strictly increase, prices
    /// are finite and positive, and volumes are finite and non-negative.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        for (i, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(EngineError::InvalidSeries(format!(
                    "bar {} at {} has a non-positive or non-finite price",
                    i, bar.time
                )));
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(EngineError::InvalidSeries(format!(
                    "bar {} at {} has an invalid volume {}",
                    i, bar.time, bar.volume
                )));
            }
            if i > 0 && bar.time <= bars[i - 1].time {
                return Err(EngineError::InvalidSeries(format!(
                    "timestamps must strictly increase: bar {} ({}) follows {}",
                    i,
                    bar.time,
                    bars[i - 1].time
                )));
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

impl<'de> Deserialize<'de> for BarSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bars = Vec::<Bar>::deserialize(deserializer)?;
        BarSeries::new(bars).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Bar {
        Bar::new(time, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn test_series_accepts_ordered_bars() {
        let series = BarSeries::new(vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last().unwrap().close, 12.0);
        assert_eq!(series.bars()[0].close, 10.0);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = BarSeries::new(vec![bar(1, 10.0), bar(1, 11.0)]);
        assert!(matches!(result, Err(EngineError::InvalidSeries(_))));
    }

    #[test]
    fn test_series_rejects_non_positive_price() {
        let mut bad = bar(2, 10.0);
        bad.low = 0.0;
        let result = BarSeries::new(vec![bar(1, 10.0), bad]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_rejects_negative_volume() {
        let mut bad = bar(2, 10.0);
        bad.volume = -1.0;
        assert!(BarSeries::new(vec![bad]).is_err());
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = BarSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_series_deserialization_validates() {
        let ok: BarSeries = serde_json::from_str(
            r#"[{"time":1,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10.0},
                {"time":2,"open":1.5,"high":2.5,"low":1.0,"close":2.0}]"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.bars()[1].volume, 0.0);

        let bad = serde_json::from_str::<BarSeries>(
            r#"[{"time":2,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10.0},
                {"time":1,"open":1.5,"high":2.5,"low":1.0,"close":2.0,"volume":10.0}]"#,
        );
        assert!(bad.is_err());
    }
}
