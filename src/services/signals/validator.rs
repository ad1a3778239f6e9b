//! Validity gates and strength labels.

use crate::config::ValidationConfig;
use crate::types::{Direction, IndicatorSnapshot, Strength};

#[derive(Debug, Clone)]
pub struct SignalValidator {
    config: ValidationConfig,
}

impl SignalValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Enough volume traded and both trend averages defined.
    pub fn is_valid(&self, snapshot: &IndicatorSnapshot) -> bool {
        snapshot.volume >= self.config.min_volume
            && snapshot.sma_short.is_some()
            && snapshot.sma_long.is_some()
    }

    pub fn strength(&self, direction: Direction, valid: bool, snapshot: &IndicatorSnapshot) -> Strength {
        match direction {
            Direction::NoData => Strength::None,
            Direction::StrongSell => Strength::VeryStrong,
            _ if valid && self.significant_move(snapshot) => Strength::Strong,
            _ if valid => Strength::Moderate,
            _ => Strength::Weak,
        }
    }

    fn significant_move(&self, snapshot: &IndicatorSnapshot) -> bool {
        snapshot
            .price_change_pct
            .is_some_and(|c| c.abs() >= self.config.min_price_change * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(volume: f64, change: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close: 100.0,
            volume,
            sma_short: Some(100.0),
            sma_long: Some(99.0),
            price_change_pct: change,
            ..Default::default()
        }
    }

    #[test]
    fn test_validity_gates() {
        let validator = SignalValidator::new(ValidationConfig {
            min_volume: 1_000_000.0,
            min_price_change: 0.03,
        });
        assert!(validator.is_valid(&snapshot(2_000_000.0, None)));
        assert!(!validator.is_valid(&snapshot(500.0, None)));

        let missing_sma = IndicatorSnapshot {
            sma_long: None,
            ..snapshot(2_000_000.0, None)
        };
        assert!(!validator.is_valid(&missing_sma));
    }

    #[test]
    fn test_strength_labels() {
        let validator = SignalValidator::new(ValidationConfig::default());
        let big_move = snapshot(1000.0, Some(-4.0));
        let small_move = snapshot(1000.0, Some(1.0));

        assert_eq!(validator.strength(Direction::StrongSell, false, &big_move), Strength::VeryStrong);
        assert_eq!(validator.strength(Direction::Buy, true, &big_move), Strength::Strong);
        assert_eq!(validator.strength(Direction::Sell, true, &small_move), Strength::Moderate);
        assert_eq!(validator.strength(Direction::Hold, false, &big_move), Strength::Weak);
        assert_eq!(validator.strength(Direction::NoData, true, &big_move), Strength::None);
    }
}
