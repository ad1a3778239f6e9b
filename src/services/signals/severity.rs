//! Extended sell severity.
//!
//! A second pass over the indicator table with stricter, confirmed
//! conditions. Regular conditions can promote an evidence-free HOLD to
//! SELL; strong conditions escalate SELL-eligible bars to STRONG_SELL.

use super::fusion::FusionOutcome;
use super::indicators::{IndicatorTable, Sma};
use crate::config::{RuleThresholds, SellSeverityConfig};
use crate::types::{Direction, SellCondition, StrongSellCondition};

/// Conditions that fired at one bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeverityReport {
    pub sell: Vec<SellCondition>,
    pub strong: Vec<StrongSellCondition>,
}

#[derive(Debug, Clone)]
pub struct SellSeverity {
    config: SellSeverityConfig,
    rsi_overbought: f64,
    evidence_points: u32,
}

impl SellSeverity {
    pub fn new(config: SellSeverityConfig, rules: &RuleThresholds) -> Self {
        Self {
            config,
            rsi_overbought: rules.rsi_overbought,
            evidence_points: rules.evidence_points,
        }
    }

    /// Evaluate every regular and strong condition at index `i`.
    pub fn assess(&self, table: &IndicatorTable, i: usize) -> SeverityReport {
        let mut report = SeverityReport::default();
        if i >= table.len() {
            return report;
        }

        let rsi = table.rsi[i];
        let volume_ratio = table.volume_baseline.ratio[i];
        let price_change = table.price_change_pct[i];
        let spike = volume_ratio.is_some_and(|r| r > self.config.volume_spike_multiplier);

        let confirmed_cross = self.confirmed_bearish_cross(table, i);
        let overbought = rsi.is_some_and(|r| r > self.rsi_overbought);

        if confirmed_cross {
            report.sell.push(SellCondition::ConfirmedBearishCross);
        }
        if overbought {
            report.sell.push(SellCondition::Overbought);
        }
        if spike && price_change.is_some_and(|c| c < -self.config.selloff_drop_pct) {
            report.sell.push(SellCondition::HighVolumeSelloff);
        }
        if self.bearish_divergence(table, i) {
            report.sell.push(SellCondition::BearishDivergence);
        }

        if confirmed_cross && overbought {
            report.strong.push(StrongSellCondition::MultipleConfirmed);
        }
        if spike && rsi.is_some_and(|r| r > self.config.extreme_rsi) {
            report.strong.push(StrongSellCondition::ExtremeOverbought);
        }
        if spike && price_change.is_some_and(|c| c < -self.config.crash_drop_pct) {
            report.strong.push(StrongSellCondition::Crash);
        }

        report
    }

    /// Fold the report into the count-based outcome.
    pub fn apply(&self, mut outcome: FusionOutcome, report: SeverityReport) -> FusionOutcome {
        let breakdown = &mut outcome.breakdown;

        if self.config.promote_sell
            && outcome.direction == Direction::Hold
            && breakdown.bullish_count == 0
            && !report.sell.is_empty()
        {
            let evidence = breakdown.bearish_count + report.sell.len() as u32;
            outcome.direction = Direction::Sell;
            outcome.confidence = evidence.saturating_mul(self.evidence_points).min(100) as u8;
        }

        breakdown.sell_conditions = report.sell;
        breakdown.strong_sell_conditions = report.strong;

        let sell_eligible = outcome.direction == Direction::Sell || breakdown.is_sell_eligible();
        if !breakdown.strong_sell_conditions.is_empty()
            && (sell_eligible || !self.config.require_sell_base)
        {
            outcome.direction = Direction::StrongSell;
            outcome.confidence = 100;
        }

        outcome
    }

    /// Short SMA under long SMA now, at or above it on the two bars before.
    fn confirmed_bearish_cross(&self, table: &IndicatorTable, i: usize) -> bool {
        let (short, long) = (&table.sma_short, &table.sma_long);
        let (Some(s0), Some(l0), Some(s1), Some(l1), Some(s2), Some(l2)) = (
            back(short, i, 0),
            back(long, i, 0),
            back(short, i, 1),
            back(long, i, 1),
            back(short, i, 2),
            back(long, i, 2),
        ) else {
            return false;
        };

        s0 < l0 && s1 >= l1 && s2 >= l2
    }

    /// Mean close rising over the lookback while RSI falls from a high level.
    fn bearish_divergence(&self, table: &IndicatorTable, i: usize) -> bool {
        let lookback = self.config.divergence_lookback;
        let mean_close = Sma::rolling(&table.close[..=i], lookback);

        let (Some(mean_now), Some(mean_then), Some(rsi_now), Some(rsi_then)) = (
            back(&mean_close, i, 0),
            back(&mean_close, i, lookback),
            back(&table.rsi, i, 0),
            back(&table.rsi, i, lookback),
        ) else {
            return false;
        };

        mean_now > mean_then && rsi_now < rsi_then && rsi_now > self.config.divergence_rsi_floor
    }
}

fn back(column: &[Option<f64>], i: usize, offset: usize) -> Option<f64> {
    column.get(i.checked_sub(offset)?).copied().flatten()
}
