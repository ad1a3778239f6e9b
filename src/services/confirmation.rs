//! AI confirmation handling: reply parsing and the delivery policy.

use tracing::{info, warn};

use crate::config::DeliveryConfig;
use crate::types::{ConfirmRecommendation, Confirmation, Direction, RiskAssessment, Signal};

impl Confirmation {
    /// Parse the collaborator's reply.
    ///
    /// Accepts a bare JSON object or one wrapped in a markdown code fence.
    /// Anything unparseable becomes a cautious pass-through carrying the
    /// raw text as the analysis.
    pub fn parse_reply(reply: &str) -> Self {
        let body = extract_json(reply.trim());

        match serde_json::from_str::<Confirmation>(body) {
            Ok(mut confirmation) => {
                confirmation.confidence = confirmation.confidence.clamp(0.0, 1.0);
                confirmation
            }
            Err(e) => {
                warn!("Failed to parse confirmation reply: {}", e);
                Self {
                    confirmed: true,
                    confidence: 0.5,
                    analysis: reply.trim().to_string(),
                    recommendation: ConfirmRecommendation::Confirm,
                    risk_assessment: RiskAssessment::Medium,
                    key_factors: vec!["Technical analysis".to_string()],
                }
            }
        }
    }
}

/// Strip a ```json (or bare ```) fence around the payload.
fn extract_json(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        let end = rest.find("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        let end = rest.rfind("```").unwrap_or(rest.len());
        return rest[..end].trim();
    }
    text
}

/// Outcome of the delivery policy for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryDecision {
    pub deliver: bool,
    /// Threshold the confidence was compared against.
    pub threshold: f64,
    /// Confidence after any watchlist boost.
    pub confidence: f64,
    pub reason: String,
}

impl DeliveryDecision {
    fn drop(threshold: f64, confidence: f64, reason: String) -> Self {
        Self {
            deliver: false,
            threshold,
            confidence,
            reason,
        }
    }
}

/// Decides whether a confirmed signal is surfaced to users.
#[derive(Debug, Clone, Default)]
pub struct DeliveryPolicy {
    config: DeliveryConfig,
}

impl DeliveryPolicy {
    pub fn new(config: DeliveryConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, signal: &Signal, confirmation: &Confirmation) -> DeliveryDecision {
        let symbol = &signal.symbol;
        let mut confidence = confirmation.confidence;
        let mut threshold = self.config.confidence_threshold;

        if !signal.valid || signal.direction == Direction::NoData {
            return DeliveryDecision::drop(threshold, confidence, "Signal is not valid".to_string());
        }

        if signal.direction == Direction::Hold {
            if !self.config.enable_hold_signals {
                info!("HOLD signals disabled for {}", symbol);
                return DeliveryDecision::drop(threshold, confidence, "HOLD signals disabled".to_string());
            }
            threshold = if self.config.hold_bypass_confidence {
                0.0
            } else {
                self.config.hold_confidence_threshold
            };
        } else if self.config.is_watchlisted(symbol) {
            threshold = self.config.watchlist_threshold;
            confidence = (confidence * self.config.watchlist_multiplier).min(1.0);
            info!(
                "Watchlist symbol {}: threshold {} with boosted confidence {:.2}",
                symbol, threshold, confidence
            );
        }

        if confirmation.recommendation == ConfirmRecommendation::Reject {
            info!("Confirmation rejected signal for {}: {}", symbol, confirmation.analysis);
            return DeliveryDecision::drop(threshold, confidence, "Rejected by confirmation".to_string());
        }

        if confidence < threshold {
            info!(
                "Confirmation confidence too low for {}: {:.2} < {}",
                symbol, confidence, threshold
            );
            return DeliveryDecision::drop(
                threshold,
                confidence,
                format!("Confidence {:.2} below threshold {:.2}", confidence, threshold),
            );
        }

        DeliveryDecision {
            deliver: true,
            threshold,
            confidence,
            reason: format!("{} confirmed", signal.direction),
        }
    }
}
