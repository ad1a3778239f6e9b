use serde::{Deserialize, Serialize};

use super::signals::{Direction, Signal, Strength};
use crate::services::signals::round2;

/// Flattened projection of a [`Signal`] handed to the AI confirmation
/// collaborator. Prices are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub symbol: String,
    pub signal: Direction,
    pub signal_reason: String,
    pub confidence: u8,
    pub current_price: f64,
    pub price_change: f64,
    pub volume_ratio: f64,
    pub rsi: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub strength: Strength,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub recent_high: f64,
    pub recent_low: f64,
    pub patterns: Vec<String>,
}

impl From<&Signal> for ConfirmationRequest {
    fn from(signal: &Signal) -> Self {
        let ind = &signal.indicators;
        Self {
            symbol: signal.symbol.clone(),
            signal: signal.direction,
            signal_reason: signal.reason.clone(),
            confidence: signal.confidence,
            current_price: round2(signal.price),
            price_change: round2(ind.price_change_pct.unwrap_or(0.0)),
            volume_ratio: round2(ind.volume_ratio.unwrap_or(1.0)),
            rsi: round2(ind.rsi.unwrap_or(50.0)),
            sma_short: round2(ind.sma_short.unwrap_or(signal.price)),
            sma_long: round2(ind.sma_long.unwrap_or(signal.price)),
            strength: signal.strength,
            stop_loss_price: round2(signal.stop_loss()),
            take_profit_price: round2(signal.take_profit()),
            recent_high: round2(ind.resistance.unwrap_or(signal.price)),
            recent_low: round2(ind.support.unwrap_or(signal.price)),
            patterns: signal
                .patterns
                .iter()
                .filter(|(_, tag)| tag.is_detected())
                .map(|(name, tag)| format!("{}:{}", name, tag.label()))
                .collect(),
        }
    }
}

/// Verdict suggested by the AI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmRecommendation {
    Confirm,
    Reject,
    Modify,
    ProceedWithCaution,
    #[serde(other)]
    Unknown,
}

impl ConfirmRecommendation {
    pub fn label(&self) -> &'static str {
        match self {
            ConfirmRecommendation::Confirm => "CONFIRM",
            ConfirmRecommendation::Reject => "REJECT",
            ConfirmRecommendation::Modify => "MODIFY",
            ConfirmRecommendation::ProceedWithCaution => "PROCEED_WITH_CAUTION",
            ConfirmRecommendation::Unknown => "UNKNOWN",
        }
    }
}

/// Risk level assessed by the AI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskAssessment {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl RiskAssessment {
    pub fn label(&self) -> &'static str {
        match self {
            RiskAssessment::Low => "LOW",
            RiskAssessment::Medium => "MEDIUM",
            RiskAssessment::High => "HIGH",
            RiskAssessment::Unknown => "UNKNOWN",
        }
    }
}

/// Independent second opinion returned by the AI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub confirmed: bool,
    /// Confidence (0.0-1.0).
    pub confidence: f64,
    pub analysis: String,
    pub recommendation: ConfirmRecommendation,
    #[serde(default)]
    pub risk_assessment: RiskAssessment,
    #[serde(default)]
    pub key_factors: Vec<String>,
}

impl Confirmation {
    /// Used when confirmation is switched off: every signal passes.
    pub fn disabled() -> Self {
        Self {
            confirmed: true,
            confidence: 1.0,
            analysis: "AI confirmation disabled".to_string(),
            recommendation: ConfirmRecommendation::Confirm,
            risk_assessment: RiskAssessment::Medium,
            key_factors: Vec::new(),
        }
    }

    /// Used when the collaborator failed to answer.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            confirmed: true,
            confidence: 0.5,
            analysis: format!("AI analysis failed: {}", reason),
            recommendation: ConfirmRecommendation::ProceedWithCaution,
            risk_assessment: RiskAssessment::Unknown,
            key_factors: vec!["Technical analysis only".to_string()],
        }
    }
}
