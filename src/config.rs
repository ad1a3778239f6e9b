use std::env;

use crate::error::{EngineError, Result};
use crate::types::Profile;

/// Rolling window lengths for the indicator table.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorWindows {
    /// Short simple moving average.
    pub sma_short: usize,
    /// Long simple moving average.
    pub sma_long: usize,
    /// Fast exponential average (also the MACD fast leg).
    pub ema_fast: usize,
    /// Slow exponential average (also the MACD slow leg).
    pub ema_slow: usize,
    /// MACD signal line smoothing.
    pub macd_signal: usize,
    /// RSI smoothing period.
    pub rsi_period: usize,
    /// Bollinger band moving average window.
    pub bollinger_period: usize,
    /// Bollinger band standard deviation multiplier.
    pub bollinger_std_dev: f64,
    /// Volume baseline average.
    pub volume_period: usize,
    /// Rolling support (min low) / resistance (max high).
    pub support_resistance_period: usize,
    /// Trailing window for Fibonacci swing high/low.
    pub fibonacci_period: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            ema_fast: 12,
            ema_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            volume_period: 20,
            support_resistance_period: 20,
            fibonacci_period: 20,
        }
    }
}

/// Thresholds for the fusion rule families and evidence aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleThresholds {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Inclusive band reported as NEUTRAL.
    pub rsi_neutral_low: f64,
    pub rsi_neutral_high: f64,
    /// Band width (% of middle band) below which bands are squeezed.
    pub squeeze_width_pct: f64,
    pub high_volume_multiplier: f64,
    pub low_volume_multiplier: f64,
    /// Relative distance to support/resistance that counts as "at" the level.
    pub level_proximity: f64,
    /// Minimum winning evidence count for BUY/SELL.
    pub min_evidence: u32,
    /// Confidence points per evidence tag.
    pub evidence_points: u32,
    /// Confidence reported with HOLD.
    pub hold_confidence: u8,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_neutral_low: 40.0,
            rsi_neutral_high: 60.0,
            squeeze_width_pct: 10.0,
            high_volume_multiplier: 1.5,
            low_volume_multiplier: 0.5,
            level_proximity: 0.02,
            min_evidence: 2,
            evidence_points: 20,
            hold_confidence: 50,
        }
    }
}

/// Extended sell severity: regular SELL and STRONG_SELL conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct SellSeverityConfig {
    /// Turn a HOLD without bullish evidence into SELL when a regular
    /// SELL condition fires.
    pub promote_sell: bool,
    /// Volume ratio that counts as a spike for sell-offs and crashes.
    pub volume_spike_multiplier: f64,
    /// Single-bar drop (%) for a high-volume sell-off.
    pub selloff_drop_pct: f64,
    /// Single-bar drop (%) for a crash.
    pub crash_drop_pct: f64,
    /// RSI level for extreme overbought.
    pub extreme_rsi: f64,
    /// Bars between the two points compared for divergence.
    pub divergence_lookback: usize,
    /// RSI must be above this level for divergence.
    pub divergence_rsi_floor: f64,
    /// STRONG_SELL only escalates SELL-eligible evidence.
    pub require_sell_base: bool,
}

impl Default for SellSeverityConfig {
    fn default() -> Self {
        Self {
            promote_sell: false,
            volume_spike_multiplier: 3.0,
            selloff_drop_pct: 5.0,
            crash_drop_pct: 10.0,
            extreme_rsi: 85.0,
            divergence_lookback: 10,
            divergence_rsi_floor: 70.0,
            require_sell_base: true,
        }
    }
}

/// Stop-loss / take-profit calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub stop_fraction: f64,
    pub profit_fraction: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_fraction: 0.05,
            profit_fraction: 0.10,
        }
    }
}

/// Liquidity and significance gates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Minimum bar volume for a valid signal.
    pub min_volume: f64,
    /// Minimum single-bar change (fraction) for STRONG.
    pub min_price_change: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_volume: 0.0,
            min_price_change: 0.03,
        }
    }
}

/// Pattern detector windows and tolerances. All are approximations.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternParams {
    /// Bars needed for the full catalog.
    pub min_window: usize,
    /// Bars needed for head-and-shoulders and triangle only.
    pub degraded_window: usize,
    pub head_shoulders_window: usize,
    pub double_window: usize,
    /// Max relative gap between the two extremes of a double top/bottom.
    pub double_tolerance: f64,
    pub triangle_window: usize,
    /// Slope magnitude separating "flat" from "trending".
    pub triangle_slope: f64,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            min_window: 50,
            degraded_window: 20,
            head_shoulders_window: 20,
            double_window: 30,
            double_tolerance: 0.02,
            triangle_window: 20,
            triangle_slope: 0.1,
        }
    }
}

/// Full engine configuration, passed to the engine at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub profile: Profile,
    pub windows: IndicatorWindows,
    pub rules: RuleThresholds,
    pub severity: SellSeverityConfig,
    pub risk: RiskConfig,
    pub validation: ValidationConfig,
    pub patterns: PatternParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::short_horizon()
    }
}

impl EngineConfig {
    /// Crypto-style preset: 30/70 RSI, 5% stop, 10% target.
    pub fn short_horizon() -> Self {
        Self {
            profile: Profile::ShortHorizon,
            windows: IndicatorWindows::default(),
            rules: RuleThresholds::default(),
            severity: SellSeverityConfig::default(),
            risk: RiskConfig::default(),
            validation: ValidationConfig::default(),
            patterns: PatternParams::default(),
        }
    }

    /// Equity-style preset: smoother RSI, 20/80 bands, 15% stop, 25% target.
    pub fn long_horizon() -> Self {
        Self {
            profile: Profile::LongHorizon,
            windows: IndicatorWindows {
                rsi_period: 21,
                support_resistance_period: 10,
                ..IndicatorWindows::default()
            },
            rules: RuleThresholds {
                rsi_oversold: 20.0,
                rsi_overbought: 80.0,
                ..RuleThresholds::default()
            },
            severity: SellSeverityConfig {
                promote_sell: true,
                ..SellSeverityConfig::default()
            },
            risk: RiskConfig {
                stop_fraction: 0.15,
                profit_fraction: 0.25,
            },
            validation: ValidationConfig {
                min_volume: 1_000_000.0,
                min_price_change: 0.03,
            },
            patterns: PatternParams::default(),
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::ShortHorizon => Self::short_horizon(),
            Profile::LongHorizon => Self::long_horizon(),
        }
    }

    /// Bars needed before every indicator the rules read is defined.
    pub fn min_history(&self) -> usize {
        let w = &self.windows;
        [
            w.sma_long,
            w.ema_slow + w.macd_signal - 1,
            w.rsi_period + 1,
            w.bollinger_period,
            w.volume_period,
            w.support_resistance_period,
            self.severity.divergence_lookback * 2,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Reject configurations no analysis can run with.
    pub fn validate(&self) -> Result<()> {
        let w = &self.windows;
        let windows = [
            ("sma_short", w.sma_short),
            ("sma_long", w.sma_long),
            ("ema_fast", w.ema_fast),
            ("ema_slow", w.ema_slow),
            ("macd_signal", w.macd_signal),
            ("rsi_period", w.rsi_period),
            ("bollinger_period", w.bollinger_period),
            ("volume_period", w.volume_period),
            ("support_resistance_period", w.support_resistance_period),
            ("fibonacci_period", w.fibonacci_period),
            ("divergence_lookback", self.severity.divergence_lookback),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, len)| *len == 0) {
            return Err(config_error(format!("window {} must be positive", name)));
        }
        if w.sma_short >= w.sma_long {
            return Err(config_error(format!(
                "sma_short ({}) must be shorter than sma_long ({})",
                w.sma_short, w.sma_long
            )));
        }
        if w.ema_fast >= w.ema_slow {
            return Err(config_error(format!(
                "ema_fast ({}) must be shorter than ema_slow ({})",
                w.ema_fast, w.ema_slow
            )));
        }
        if !(w.bollinger_std_dev.is_finite() && w.bollinger_std_dev > 0.0) {
            return Err(config_error("bollinger_std_dev must be positive".into()));
        }

        let r = &self.rules;
        if !(0.0..=100.0).contains(&r.rsi_oversold)
            || !(0.0..=100.0).contains(&r.rsi_overbought)
            || r.rsi_oversold >= r.rsi_overbought
        {
            return Err(config_error(format!(
                "rsi thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                r.rsi_oversold, r.rsi_overbought
            )));
        }
        if r.rsi_neutral_low > r.rsi_neutral_high
            || r.rsi_neutral_low <= r.rsi_oversold
            || r.rsi_neutral_high >= r.rsi_overbought
        {
            return Err(config_error(
                "rsi neutral band must sit strictly between oversold and overbought".into(),
            ));
        }
        if !(r.high_volume_multiplier > 0.0 && r.low_volume_multiplier > 0.0)
            || r.low_volume_multiplier >= r.high_volume_multiplier
        {
            return Err(config_error("volume multipliers must be positive and low < high".into()));
        }
        if r.min_evidence == 0 {
            return Err(config_error("min_evidence must be at least 1".into()));
        }
        if r.hold_confidence > 100 {
            return Err(config_error("hold_confidence must be at most 100".into()));
        }

        let fractions = [
            ("squeeze_width_pct", r.squeeze_width_pct),
            ("level_proximity", r.level_proximity),
            ("stop_fraction", self.risk.stop_fraction),
            ("profit_fraction", self.risk.profit_fraction),
            ("min_volume", self.validation.min_volume),
            ("min_price_change", self.validation.min_price_change),
            ("selloff_drop_pct", self.severity.selloff_drop_pct),
            ("crash_drop_pct", self.severity.crash_drop_pct),
            ("double_tolerance", self.patterns.double_tolerance),
            ("triangle_slope", self.patterns.triangle_slope),
        ];
        if let Some((name, value)) = fractions.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(config_error(format!("{} must be non-negative, got {}", name, value)));
        }
        if self.risk.stop_fraction >= 1.0 {
            return Err(config_error("stop_fraction must be below 1".into()));
        }
        if self.severity.volume_spike_multiplier <= 0.0 {
            return Err(config_error("volume_spike_multiplier must be positive".into()));
        }

        let p = &self.patterns;
        if [p.degraded_window, p.head_shoulders_window, p.double_window, p.triangle_window]
            .iter()
            .any(|w| *w < 3)
        {
            return Err(config_error("pattern windows must cover at least 3 bars".into()));
        }
        if p.degraded_window > p.min_window {
            return Err(config_error(format!(
                "degraded pattern window ({}) exceeds the full window ({})",
                p.degraded_window, p.min_window
            )));
        }

        Ok(())
    }

    /// Load the preset named by `SIGNAL_PROFILE`, then apply overrides.
    pub fn from_env() -> Self {
        let profile = env::var("SIGNAL_PROFILE")
            .ok()
            .and_then(|p| Profile::parse(&p))
            .unwrap_or_default();
        let mut config = Self::for_profile(profile);

        if let Some(v) = env_parse("SMA_SHORT_PERIOD") {
            config.windows.sma_short = v;
        }
        if let Some(v) = env_parse("SMA_LONG_PERIOD") {
            config.windows.sma_long = v;
        }
        if let Some(v) = env_parse("RSI_PERIOD") {
            config.windows.rsi_period = v;
        }
        if let Some(v) = env_parse("RSI_OVERSOLD_THRESHOLD") {
            config.rules.rsi_oversold = v;
        }
        if let Some(v) = env_parse("RSI_OVERBOUGHT_THRESHOLD") {
            config.rules.rsi_overbought = v;
        }
        if let Some(v) = env_parse("STOP_LOSS_PERCENTAGE") {
            config.risk.stop_fraction = v;
        }
        if let Some(v) = env_parse("TAKE_PROFIT_PERCENTAGE") {
            config.risk.profit_fraction = v;
        }
        if let Some(v) = env_parse("MIN_VOLUME_THRESHOLD") {
            config.validation.min_volume = v;
        }
        if let Some(v) = env_parse("MIN_PRICE_CHANGE") {
            config.validation.min_price_change = v;
        }
        if let Some(v) = env_parse("HIGH_VOLUME_SELL_MULTIPLIER") {
            config.severity.volume_spike_multiplier = v;
        }

        config
    }
}

fn config_error(message: String) -> EngineError {
    EngineError::Configuration(message)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| v == "true" || v == "1")
}

/// Currency used when rendering prices in messages.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCurrency {
    /// ISO-style code, e.g. "USD".
    pub code: String,
    /// Symbol placed before the amount; when `None` the code follows it.
    pub prefix: Option<String>,
    pub decimals: usize,
}

impl QuoteCurrency {
    pub fn usd() -> Self {
        Self {
            code: "USD".to_string(),
            prefix: Some("$".to_string()),
            decimals: 2,
        }
    }

    pub fn idr() -> Self {
        Self {
            code: "IDR".to_string(),
            prefix: None,
            decimals: 0,
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Self::usd()),
            "IDR" => Some(Self::idr()),
            _ => None,
        }
    }
}

impl Default for QuoteCurrency {
    fn default() -> Self {
        Self::usd()
    }
}

/// Rules the orchestration layer applies before surfacing a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryConfig {
    /// Minimum AI confidence (0.0-1.0) for BUY/SELL signals.
    pub confidence_threshold: f64,
    /// Deliver HOLD signals at all.
    pub enable_hold_signals: bool,
    /// Deliver HOLD signals whatever the AI confidence.
    pub hold_bypass_confidence: bool,
    /// Threshold for HOLD signals when not bypassed.
    pub hold_confidence_threshold: f64,
    /// Lower threshold for watchlist symbols.
    pub watchlist_threshold: f64,
    /// Confidence boost for watchlist symbols (result capped at 1.0).
    pub watchlist_multiplier: f64,
    /// Upper-cased watchlist symbols.
    pub watchlist: Vec<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            enable_hold_signals: true,
            hold_bypass_confidence: true,
            hold_confidence_threshold: 0.3,
            watchlist_threshold: 0.5,
            watchlist_multiplier: 1.2,
            watchlist: Vec::new(),
        }
    }
}

impl DeliveryConfig {
    pub fn is_watchlisted(&self, symbol: &str) -> bool {
        self.watchlist.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub engine: EngineConfig,
    pub delivery: DeliveryConfig,
    pub currency: QuoteCurrency,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DeliveryConfig::default();

        // Format: "BTC-USD,ETH-USD,BBCA.JK"
        let watchlist = env::var("WATCHLIST_SYMBOLS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|sym| sym.trim().to_uppercase())
                    .filter(|sym| !sym.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            engine: EngineConfig::from_env(),
            delivery: DeliveryConfig {
                confidence_threshold: env_parse("CONFIRMATION_CONFIDENCE_THRESHOLD")
                    .unwrap_or(defaults.confidence_threshold),
                enable_hold_signals: env_flag("ENABLE_HOLD_SIGNALS")
                    .unwrap_or(defaults.enable_hold_signals),
                hold_bypass_confidence: env_flag("SEND_HOLD_SIGNALS_REGARDLESS_OF_CONFIDENCE")
                    .unwrap_or(defaults.hold_bypass_confidence),
                hold_confidence_threshold: env_parse("HOLD_SIGNAL_CONFIDENCE_THRESHOLD")
                    .unwrap_or(defaults.hold_confidence_threshold),
                watchlist_threshold: env_parse("WATCHLIST_ALERT_THRESHOLD")
                    .unwrap_or(defaults.watchlist_threshold),
                watchlist_multiplier: env_parse("WATCHLIST_PRIORITY_MULTIPLIER")
                    .unwrap_or(defaults.watchlist_multiplier),
                watchlist,
            },
            currency: env::var("QUOTE_CURRENCY")
                .ok()
                .and_then(|c| QuoteCurrency::parse(&c))
                .unwrap_or_default(),
        }
    }
}
