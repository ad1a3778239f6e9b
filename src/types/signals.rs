use serde::{Deserialize, Serialize};
use std::fmt;

/// Calibration profile for signal calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Short horizon: crypto-style intraday bars, tight stops.
    #[default]
    ShortHorizon,
    /// Long horizon: equity-style daily bars, wide stops, stricter sells.
    LongHorizon,
}

impl Profile {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "short" | "short_horizon" | "crypto" => Some(Self::ShortHorizon),
            "long" | "long_horizon" | "equity" => Some(Self::LongHorizon),
            _ => None,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShortHorizon => "Short Horizon",
            Self::LongHorizon => "Long Horizon",
        }
    }
}

/// Final trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
    StrongSell,
    Hold,
    NoData,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::StrongSell => "STRONG_SELL",
            Direction::Hold => "HOLD",
            Direction::NoData => "NO_DATA",
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Direction::Sell | Direction::StrongSell)
    }

    /// Whether risk levels are computed for this direction.
    pub fn is_directional(&self) -> bool {
        matches!(self, Direction::Buy | Direction::Sell | Direction::StrongSell)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete strength label derived from validity gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strength {
    Weak,
    #[serde(alias = "MEDIUM")]
    Moderate,
    Strong,
    VeryStrong,
    None,
}

impl Strength {
    pub fn label(&self) -> &'static str {
        match self {
            Strength::Weak => "WEAK",
            Strength::Moderate => "MODERATE",
            Strength::Strong => "STRONG",
            Strength::VeryStrong => "VERY_STRONG",
            Strength::None => "NONE",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a detected chart pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternTag {
    #[default]
    None,
    Bullish,
    Bearish,
    Ascending,
    Descending,
    Symmetrical,
}

impl PatternTag {
    pub fn label(&self) -> &'static str {
        match self {
            PatternTag::None => "NONE",
            PatternTag::Bullish => "BULLISH",
            PatternTag::Bearish => "BEARISH",
            PatternTag::Ascending => "ASCENDING",
            PatternTag::Descending => "DESCENDING",
            PatternTag::Symmetrical => "SYMMETRICAL",
        }
    }

    pub fn is_detected(&self) -> bool {
        *self != PatternTag::None
    }
}

/// Chart patterns found over the trailing window of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFlags {
    pub head_and_shoulders: PatternTag,
    pub double_top: PatternTag,
    pub double_bottom: PatternTag,
    pub triangle: PatternTag,
}

impl PatternFlags {
    /// Pattern name to tag pairs, in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, PatternTag)> {
        [
            ("head_and_shoulders", self.head_and_shoulders),
            ("double_top", self.double_top),
            ("double_bottom", self.double_bottom),
            ("triangle", self.triangle),
        ]
        .into_iter()
    }

    /// Names of the patterns that were detected.
    pub fn detected(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, tag)| tag.is_detected())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Tag emitted by one of the fusion rule families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleTag {
    // Trend
    BullishMaCross,
    BearishMaCross,
    BullishTrend,
    BearishTrend,
    // Momentum
    BullishMacd,
    BearishMacd,
    Oversold,
    Overbought,
    Neutral,
    // Volatility
    BbBreakoutUp,
    BbBreakoutDown,
    BbSqueeze,
    // Volume
    HighVolume,
    LowVolume,
    // Support / resistance
    AtSupport,
    AtResistance,
}

impl RuleTag {
    pub fn label(&self) -> &'static str {
        match self {
            RuleTag::BullishMaCross => "BULLISH_MA_CROSS",
            RuleTag::BearishMaCross => "BEARISH_MA_CROSS",
            RuleTag::BullishTrend => "BULLISH_TREND",
            RuleTag::BearishTrend => "BEARISH_TREND",
            RuleTag::BullishMacd => "BULLISH_MACD",
            RuleTag::BearishMacd => "BEARISH_MACD",
            RuleTag::Oversold => "OVERSOLD",
            RuleTag::Overbought => "OVERBOUGHT",
            RuleTag::Neutral => "NEUTRAL",
            RuleTag::BbBreakoutUp => "BB_BREAKOUT_UP",
            RuleTag::BbBreakoutDown => "BB_BREAKOUT_DOWN",
            RuleTag::BbSqueeze => "BB_SQUEEZE",
            RuleTag::HighVolume => "HIGH_VOLUME",
            RuleTag::LowVolume => "LOW_VOLUME",
            RuleTag::AtSupport => "AT_SUPPORT",
            RuleTag::AtResistance => "AT_RESISTANCE",
        }
    }

    /// Counts as bullish evidence.
    pub fn is_bullish(&self) -> bool {
        let label = self.label();
        label.contains("BULLISH") || label.contains("OVERSOLD")
    }

    /// Counts as bearish evidence.
    pub fn is_bearish(&self) -> bool {
        let label = self.label();
        label.contains("BEARISH") || label.contains("OVERBOUGHT")
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Regular SELL condition from the extended severity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellCondition {
    /// Short SMA crossed below long SMA, confirmed by the bar before.
    ConfirmedBearishCross,
    /// Oscillator above the overbought threshold.
    Overbought,
    /// Volume spike together with a sharp single-bar drop.
    HighVolumeSelloff,
    /// Rising price trend while the oscillator falls from a high level.
    BearishDivergence,
}

impl SellCondition {
    pub fn reason(&self) -> &'static str {
        match self {
            SellCondition::ConfirmedBearishCross => "Confirmed SMA bearish crossover",
            SellCondition::Overbought => "RSI overbought",
            SellCondition::HighVolumeSelloff => "Major high volume sell-off",
            SellCondition::BearishDivergence => "Bearish divergence",
        }
    }
}

/// Condition that escalates a SELL to STRONG_SELL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrongSellCondition {
    /// Confirmed bearish cross and overbought oscillator together.
    MultipleConfirmed,
    /// Oscillator above the extreme threshold with a volume spike.
    ExtremeOverbought,
    /// Large single-bar drop with a volume spike.
    Crash,
}

impl StrongSellCondition {
    pub fn reason(&self) -> &'static str {
        match self {
            StrongSellCondition::MultipleConfirmed => "Multiple confirmed bearish signals",
            StrongSellCondition::ExtremeOverbought => "Extreme overbought on high volume",
            StrongSellCondition::Crash => "Major price crash on high volume",
        }
    }
}

/// Which rules fired for one analysis, grouped by family.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBreakdown {
    pub trend: Vec<RuleTag>,
    pub momentum: Vec<RuleTag>,
    pub volatility: Vec<RuleTag>,
    pub volume: Vec<RuleTag>,
    pub support_resistance: Vec<RuleTag>,
    pub sell_conditions: Vec<SellCondition>,
    pub strong_sell_conditions: Vec<StrongSellCondition>,
    pub bullish_count: u32,
    pub bearish_count: u32,
}

impl RuleBreakdown {
    /// All tags from every family.
    pub fn tags(&self) -> impl Iterator<Item = RuleTag> + '_ {
        self.trend
            .iter()
            .chain(&self.momentum)
            .chain(&self.volatility)
            .chain(&self.volume)
            .chain(&self.support_resistance)
            .copied()
    }

    pub fn contains(&self, tag: RuleTag) -> bool {
        self.tags().any(|t| t == tag)
    }

    /// Whether the extended pass found any regular SELL condition.
    pub fn is_sell_eligible(&self) -> bool {
        !self.sell_conditions.is_empty()
    }
}

/// Indicator values at the evaluated bar. `None` means the rolling
/// window was not yet full, or the value is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub volume: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub rsi: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    /// Band width as a percentage of the middle band.
    pub bb_width: Option<f64>,
    pub volume_baseline: Option<f64>,
    /// Volume divided by its rolling baseline.
    pub volume_ratio: Option<f64>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Single-bar close-to-close change in percent.
    pub price_change_pct: Option<f64>,
}

/// Fibonacci retracement levels from the recent swing high/low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FibonacciLevels {
    pub swing_high: f64,
    pub swing_low: f64,
    pub level_236: f64,
    pub level_382: f64,
    pub level_500: f64,
    pub level_618: f64,
}

/// Entry, stop-loss and take-profit for a directional signal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevels {
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_reward: f64,
}

/// The engine's output for one analysis call.
///
/// Built fresh from the latest bar on every call and never mutated;
/// downstream collaborators receive it by reference or clone it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Symbol this signal is for.
    pub symbol: String,
    /// Calibration profile used.
    pub profile: Profile,
    /// Unix timestamp (milliseconds) of the evaluated bar.
    pub timestamp: i64,
    /// Close of the evaluated bar.
    pub price: f64,
    pub direction: Direction,
    /// Evidence score (0-100).
    pub confidence: u8,
    pub strength: Strength,
    /// Liquidity and data gates passed. Advisory only.
    pub valid: bool,
    #[serde(flatten)]
    pub risk: RiskLevels,
    pub indicators: IndicatorSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fibonacci: Option<FibonacciLevels>,
    pub patterns: PatternFlags,
    pub breakdown: RuleBreakdown,
    /// Description explaining the recommendation.
    pub reason: String,
}

impl Signal {
    /// Signal returned when there is not enough history to analyze.
    pub fn no_data(symbol: &str, profile: Profile, timestamp: i64, price: f64, reason: String) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            profile,
            timestamp,
            price,
            direction: Direction::NoData,
            confidence: 0,
            strength: Strength::None,
            valid: false,
            risk: RiskLevels::default(),
            indicators: IndicatorSnapshot::default(),
            fibonacci: None,
            patterns: PatternFlags::default(),
            breakdown: RuleBreakdown::default(),
            reason,
        }
    }

    pub fn entry_price(&self) -> f64 {
        self.risk.entry_price
    }

    pub fn stop_loss(&self) -> f64 {
        self.risk.stop_loss
    }

    pub fn take_profit(&self) -> f64 {
        self.risk.take_profit
    }

    pub fn risk_reward(&self) -> f64 {
        self.risk.risk_reward
    }
}
