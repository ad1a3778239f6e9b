//! Entry, stop-loss and take-profit levels.

use super::round2;
use crate::config::RiskConfig;
use crate::types::{Direction, IndicatorSnapshot, RiskLevels};

#[derive(Debug, Clone)]
pub struct RiskCalculator {
    config: RiskConfig,
}

impl RiskCalculator {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Levels for `direction` at the evaluated bar. HOLD and NO_DATA get
    /// all zeros.
    ///
    /// Stops and targets are clamped by the rolling support/resistance;
    /// when a level is undefined the percentage bound is used alone.
    pub fn levels(&self, direction: Direction, snapshot: &IndicatorSnapshot) -> RiskLevels {
        let close = snapshot.close;
        let (stop_loss, take_profit) = match direction {
            Direction::Buy => {
                let stop = close * (1.0 - self.config.stop_fraction);
                let target = close * (1.0 + self.config.profit_fraction);
                (
                    snapshot.support.map_or(stop, |s| s.max(stop)),
                    snapshot.resistance.map_or(target, |r| r.min(target)),
                )
            }
            Direction::Sell | Direction::StrongSell => {
                let stop = close * (1.0 + self.config.stop_fraction);
                let target = close * (1.0 - self.config.profit_fraction);
                (
                    snapshot.resistance.map_or(stop, |r| r.min(stop)),
                    snapshot.support.map_or(target, |s| s.max(target)),
                )
            }
            Direction::Hold | Direction::NoData => return RiskLevels::default(),
        };

        RiskLevels {
            entry_price: close,
            stop_loss,
            take_profit,
            risk_reward: risk_reward(close, stop_loss, take_profit),
        }
    }
}

/// |target - entry| / |entry - stop|, two decimals; 0 when entry equals stop.
pub fn risk_reward(entry: f64, stop_loss: f64, take_profit: f64) -> f64 {
    let risk = (entry - stop_loss).abs();
    if risk == 0.0 {
        return 0.0;
    }
    round2((take_profit - entry).abs() / risk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(close: f64, support: Option<f64>, resistance: Option<f64>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close,
            support,
            resistance,
            ..Default::default()
        }
    }

    #[test]
    fn test_buy_levels_clamped_by_levels() {
        let calc = RiskCalculator::new(RiskConfig::default());
        let levels = calc.levels(Direction::Buy, &snapshot(100.0, Some(97.0), Some(104.0)));
        assert_eq!(levels.entry_price, 100.0);
        assert_eq!(levels.stop_loss, 97.0);
        assert_eq!(levels.take_profit, 104.0);
        assert_eq!(levels.risk_reward, 1.33);
    }

    #[test]
    fn test_buy_levels_percentage_bound() {
        let calc = RiskCalculator::new(RiskConfig::default());
        let levels = calc.levels(Direction::Buy, &snapshot(100.0, Some(80.0), Some(150.0)));
        assert!((levels.stop_loss - 95.0).abs() < 1e-9);
        assert!((levels.take_profit - 110.0).abs() < 1e-9);
        assert_eq!(levels.risk_reward, 2.0);
    }

    #[test]
    fn test_sell_levels_mirror() {
        let calc = RiskCalculator::new(RiskConfig {
            stop_fraction: 0.15,
            profit_fraction: 0.25,
        });
        let levels = calc.levels(Direction::StrongSell, &snapshot(100.0, Some(90.0), Some(200.0)));
        assert!((levels.stop_loss - 115.0).abs() < 1e-9);
        assert_eq!(levels.take_profit, 90.0);
        assert_eq!(levels.risk_reward, 0.67);
    }

    #[test]
    fn test_hold_is_zeroed() {
        let calc = RiskCalculator::new(RiskConfig::default());
        let levels = calc.levels(Direction::Hold, &snapshot(100.0, Some(90.0), Some(110.0)));
        assert_eq!(levels, RiskLevels::default());
    }

    #[test]
    fn test_risk_reward_zero_when_entry_is_stop() {
        // Support sits on the close, so the stop is the entry
        let calc = RiskCalculator::new(RiskConfig::default());
        let levels = calc.levels(Direction::Buy, &snapshot(100.0, Some(100.0), Some(105.0)));
        assert_eq!(levels.stop_loss, levels.entry_price);
        assert_eq!(levels.risk_reward, 0.0);
        assert_eq!(risk_reward(10.0, 10.0, 12.0), 0.0);
    }
}
