//! Rule families and evidence aggregation.
//!
//! Each family looks at the current and previous indicator snapshot and
//! emits tags. Undefined inputs never fire a rule.

use crate::config::RuleThresholds;
use crate::types::{Direction, IndicatorSnapshot, RuleBreakdown, RuleTag};

/// Direction and confidence from counting rule evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    pub direction: Direction,
    pub confidence: u8,
    pub breakdown: RuleBreakdown,
}

/// Evaluates the rule families and counts bullish/bearish evidence.
#[derive(Debug, Clone)]
pub struct SignalFusion {
    rules: RuleThresholds,
}

impl SignalFusion {
    pub fn new(rules: RuleThresholds) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, current: &IndicatorSnapshot, previous: &IndicatorSnapshot) -> FusionOutcome {
        let mut breakdown = RuleBreakdown {
            trend: self.trend(current, previous),
            momentum: self.momentum(current, previous),
            volatility: self.volatility(current),
            volume: self.volume(current),
            support_resistance: self.support_resistance(current),
            ..Default::default()
        };

        let bullish = breakdown.tags().filter(RuleTag::is_bullish).count() as u32;
        let bearish = breakdown.tags().filter(RuleTag::is_bearish).count() as u32;
        breakdown.bullish_count = bullish;
        breakdown.bearish_count = bearish;

        let (direction, confidence) = if bullish > bearish && bullish >= self.rules.min_evidence {
            (Direction::Buy, self.points(bullish))
        } else if bearish > bullish && bearish >= self.rules.min_evidence {
            (Direction::Sell, self.points(bearish))
        } else {
            (Direction::Hold, self.rules.hold_confidence)
        };

        FusionOutcome {
            direction,
            confidence,
            breakdown,
        }
    }

    /// Confidence for `count` pieces of evidence, capped at 100.
    pub fn points(&self, count: u32) -> u8 {
        count.saturating_mul(self.rules.evidence_points).min(100) as u8
    }

    fn trend(&self, current: &IndicatorSnapshot, previous: &IndicatorSnapshot) -> Vec<RuleTag> {
        let mut tags = Vec::new();

        match crossing(current.ema_fast, current.ema_slow, previous.ema_fast, previous.ema_slow) {
            Some(Cross::Above) => tags.push(RuleTag::BullishMaCross),
            Some(Cross::Below) => tags.push(RuleTag::BearishMaCross),
            None => {}
        }

        if let (Some(short), Some(long)) = (current.sma_short, current.sma_long) {
            let close = current.close;
            if close > short && short > long {
                tags.push(RuleTag::BullishTrend);
            } else if close < short && short < long {
                tags.push(RuleTag::BearishTrend);
            }
        }

        tags
    }

    fn momentum(&self, current: &IndicatorSnapshot, previous: &IndicatorSnapshot) -> Vec<RuleTag> {
        let mut tags = Vec::new();

        match crossing(current.macd, current.macd_signal, previous.macd, previous.macd_signal) {
            Some(Cross::Above) => tags.push(RuleTag::BullishMacd),
            Some(Cross::Below) => tags.push(RuleTag::BearishMacd),
            None => {}
        }

        if let Some(rsi) = current.rsi {
            if rsi < self.rules.rsi_oversold {
                tags.push(RuleTag::Oversold);
            } else if rsi > self.rules.rsi_overbought {
                tags.push(RuleTag::Overbought);
            } else if (self.rules.rsi_neutral_low..=self.rules.rsi_neutral_high).contains(&rsi) {
                tags.push(RuleTag::Neutral);
            }
        }

        tags
    }

    fn volatility(&self, current: &IndicatorSnapshot) -> Vec<RuleTag> {
        let close = current.close;
        let tag = match (current.bb_upper, current.bb_lower, current.bb_width) {
            (Some(upper), _, _) if close > upper => Some(RuleTag::BbBreakoutUp),
            (_, Some(lower), _) if close < lower => Some(RuleTag::BbBreakoutDown),
            (Some(_), Some(_), Some(width)) if width < self.rules.squeeze_width_pct => {
                Some(RuleTag::BbSqueeze)
            }
            _ => None,
        };
        tag.into_iter().collect()
    }

    fn volume(&self, current: &IndicatorSnapshot) -> Vec<RuleTag> {
        let Some(baseline) = current.volume_baseline else {
            return Vec::new();
        };

        if current.volume > baseline * self.rules.high_volume_multiplier {
            vec![RuleTag::HighVolume]
        } else if current.volume < baseline * self.rules.low_volume_multiplier {
            vec![RuleTag::LowVolume]
        } else {
            Vec::new()
        }
    }

    fn support_resistance(&self, current: &IndicatorSnapshot) -> Vec<RuleTag> {
        let price = current.close;
        if price <= 0.0 {
            return Vec::new();
        }
        let near = |level: Option<f64>| {
            level.is_some_and(|l| (price - l).abs() / price < self.rules.level_proximity)
        };

        if near(current.support) {
            vec![RuleTag::AtSupport]
        } else if near(current.resistance) {
            vec![RuleTag::AtResistance]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cross {
    Above,
    Below,
}

/// Whether `line` crossed `reference` between the previous and current bar.
fn crossing(
    line: Option<f64>,
    reference: Option<f64>,
    prev_line: Option<f64>,
    prev_reference: Option<f64>,
) -> Option<Cross> {
    let (line, reference, prev_line, prev_reference) = (line?, reference?, prev_line?, prev_reference?);
    if line > reference && prev_line <= prev_reference {
        Some(Cross::Above)
    } else if line < reference && prev_line >= prev_reference {
        Some(Cross::Below)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close,
            volume: 1000.0,
            ..Default::default()
        }
    }

    fn fusion() -> SignalFusion {
        SignalFusion::new(RuleThresholds::default())
    }

    #[test]
    fn test_undefined_inputs_fire_nothing() {
        let outcome = fusion().evaluate(&snapshot(100.0), &snapshot(100.0));
        assert_eq!(outcome.direction, Direction::Hold);
        assert_eq!(outcome.confidence, 50);
        assert_eq!(outcome.breakdown.tags().count(), 0);
    }

    #[test]
    fn test_bullish_cross_and_trend_is_buy() {
        let previous = IndicatorSnapshot {
            ema_fast: Some(99.0),
            ema_slow: Some(100.0),
            ..snapshot(101.0)
        };
        let current = IndicatorSnapshot {
            ema_fast: Some(101.0),
            ema_slow: Some(100.0),
            sma_short: Some(100.0),
            sma_long: Some(98.0),
            rsi: Some(55.0),
            ..snapshot(102.0)
        };

        let outcome = fusion().evaluate(&current, &previous);
        assert_eq!(outcome.direction, Direction::Buy);
        assert_eq!(outcome.confidence, 40);
        assert_eq!(outcome.breakdown.trend, vec![RuleTag::BullishMaCross, RuleTag::BullishTrend]);
        assert_eq!(outcome.breakdown.momentum, vec![RuleTag::Neutral]);
        assert_eq!(outcome.breakdown.bullish_count, 2);
    }

    #[test]
    fn test_single_evidence_is_hold() {
        let current = IndicatorSnapshot {
            rsi: Some(80.0),
            ..snapshot(100.0)
        };
        let outcome = fusion().evaluate(&current, &snapshot(100.0));
        assert_eq!(outcome.direction, Direction::Hold);
        assert_eq!(outcome.breakdown.bearish_count, 1);
    }

    #[test]
    fn test_tie_is_hold() {
        let current = IndicatorSnapshot {
            sma_short: Some(100.0),
            sma_long: Some(98.0),
            macd: Some(-1.0),
            macd_signal: Some(0.0),
            rsi: Some(25.0),
            ..snapshot(101.0)
        };
        let previous = IndicatorSnapshot {
            macd: Some(1.0),
            macd_signal: Some(0.0),
            ..snapshot(101.0)
        };
        let outcome = fusion().evaluate(&current, &previous);
        // BULLISH_TREND + OVERSOLD vs BEARISH_MACD
        assert_eq!(outcome.direction, Direction::Buy);

        let current = IndicatorSnapshot {
            rsi: Some(50.0),
            ..current
        };
        let outcome = fusion().evaluate(&current, &previous);
        assert_eq!(outcome.breakdown.bullish_count, 1);
        assert_eq!(outcome.breakdown.bearish_count, 1);
        assert_eq!(outcome.direction, Direction::Hold);
    }

    #[test]
    fn test_confidence_caps_at_100() {
        assert_eq!(fusion().points(7), 100);
        assert_eq!(fusion().points(3), 60);
    }

    #[test]
    fn test_volatility_volume_and_levels_not_evidence() {
        let current = IndicatorSnapshot {
            bb_upper: Some(99.0),
            bb_lower: Some(90.0),
            bb_width: Some(5.0),
            volume_baseline: Some(100.0),
            support: Some(99.5),
            ..snapshot(100.0)
        };
        let outcome = fusion().evaluate(&current, &snapshot(100.0));
        assert_eq!(outcome.breakdown.volatility, vec![RuleTag::BbBreakoutUp]);
        assert_eq!(outcome.breakdown.volume, vec![RuleTag::HighVolume]);
        assert_eq!(outcome.breakdown.support_resistance, vec![RuleTag::AtSupport]);
        assert_eq!(outcome.breakdown.bullish_count, 0);
        assert_eq!(outcome.direction, Direction::Hold);
    }

    #[test]
    fn test_squeeze_and_low_volume() {
        let current = IndicatorSnapshot {
            bb_upper: Some(101.0),
            bb_lower: Some(99.0),
            bb_width: Some(2.0),
            volume_baseline: Some(5000.0),
            resistance: Some(101.0),
            ..snapshot(100.0)
        };
        let outcome = fusion().evaluate(&current, &snapshot(100.0));
        assert_eq!(outcome.breakdown.volatility, vec![RuleTag::BbSqueeze]);
        assert_eq!(outcome.breakdown.volume, vec![RuleTag::LowVolume]);
        assert_eq!(outcome.breakdown.support_resistance, vec![RuleTag::AtResistance]);
    }
}
