//! Signal engine: runs the full pipeline for one bar series.

use tracing::debug;

use super::fusion::{FusionOutcome, SignalFusion};
use super::indicators::IndicatorTable;
use super::patterns::PatternDetector;
use super::risk::RiskCalculator;
use super::severity::SellSeverity;
use super::validator::SignalValidator;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::types::{BarSeries, Direction, Signal};

/// Indicator table and signal from one analysis, for collaborators that
/// need both (e.g. chart rendering).
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub table: IndicatorTable,
    pub signal: Signal,
}

/// Stateless analysis engine configured once at construction.
///
/// `analyze` is a pure function of the series: no clock, no I/O and no
/// shared mutable state, so one engine can serve many tasks at once.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    fusion: SignalFusion,
    severity: SellSeverity,
    risk: RiskCalculator,
    validator: SignalValidator,
    patterns: PatternDetector,
}

impl SignalEngine {
    /// Build an engine, rejecting invalid configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            fusion: SignalFusion::new(config.rules.clone()),
            severity: SellSeverity::new(config.severity.clone(), &config.rules),
            risk: RiskCalculator::new(config.risk.clone()),
            validator: SignalValidator::new(config.validation.clone()),
            patterns: PatternDetector::new(config.patterns.clone()),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze the latest bar of `series`.
    pub fn analyze(&self, symbol: &str, series: &BarSeries) -> Signal {
        self.analyze_full(symbol, series).signal
    }

    /// Analyze and also return the indicator table.
    pub fn analyze_full(&self, symbol: &str, series: &BarSeries) -> Analysis {
        let bars = series.bars();
        let table = IndicatorTable::compute(bars, &self.config.windows);
        let profile = self.config.profile;
        let required = self.config.min_history();

        if bars.len() < required {
            let (timestamp, price) = series.last().map_or((0, 0.0), |b| (b.time, b.close));
            debug!(
                "Insufficient history for {}: {} bars (need {})",
                symbol,
                bars.len(),
                required
            );
            let reason = format!("Insufficient data: {} bars, need {}", bars.len(), required);
            return Analysis {
                table,
                signal: Signal::no_data(symbol, profile, timestamp, price, reason),
            };
        }

        let i = bars.len() - 1;
        let current = table.snapshot(i);
        let previous = table.snapshot(i - 1);

        let outcome = self.fusion.evaluate(&current, &previous);
        let report = self.severity.assess(&table, i);
        let outcome = self.severity.apply(outcome, report);

        let valid = self.validator.is_valid(&current);
        let strength = self.validator.strength(outcome.direction, valid, &current);
        let risk = self.risk.levels(outcome.direction, &current);
        let patterns = self.patterns.detect(bars);
        let reason = describe(&outcome);

        debug!(
            "Analyzed {} ({:?}) over {} bars: {} confidence={} strength={}",
            symbol,
            profile,
            bars.len(),
            outcome.direction,
            outcome.confidence,
            strength
        );

        let signal = Signal {
            symbol: symbol.to_uppercase(),
            profile,
            timestamp: bars[i].time,
            price: current.close,
            direction: outcome.direction,
            confidence: outcome.confidence,
            strength,
            valid,
            risk,
            indicators: current,
            fibonacci: table.fibonacci,
            patterns,
            breakdown: outcome.breakdown,
            reason,
        };

        Analysis { table, signal }
    }
}

fn describe(outcome: &FusionOutcome) -> String {
    let breakdown = &outcome.breakdown;
    let evidence = |bullish: bool| -> String {
        breakdown
            .tags()
            .filter(|t| if bullish { t.is_bullish() } else { t.is_bearish() })
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    match outcome.direction {
        Direction::StrongSell => breakdown
            .strong_sell_conditions
            .iter()
            .map(|c| c.reason())
            .collect::<Vec<_>>()
            .join("; "),
        Direction::Sell => {
            let mut parts = Vec::new();
            let bearish = evidence(false);
            if !bearish.is_empty() {
                parts.push(format!("Bearish evidence: {}", bearish));
            }
            parts.extend(breakdown.sell_conditions.iter().map(|c| c.reason().to_string()));
            parts.join("; ")
        }
        Direction::Buy => format!("Bullish evidence: {}", evidence(true)),
        Direction::Hold => format!(
            "No clear direction ({} bullish, {} bearish)",
            breakdown.bullish_count, breakdown.bearish_count
        ),
        Direction::NoData => String::new(),
    }
}
