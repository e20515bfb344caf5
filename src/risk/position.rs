//! Position sizing from entry and stop prices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_RISK_PERCENT: f64 = 0.5;
const MAX_RISK_PERCENT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    #[error("Account size must be greater than 0")]
    AccountSize,
    #[error("Risk percent must be between 0.5% and 5%")]
    RiskPercent,
    #[error("Entry and stop loss prices must be greater than 0")]
    Prices,
}

/// Inputs for a price-based position size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub account_size: f64,
    pub risk_percent: f64,
    pub entry_price: f64,
    pub stop_loss: f64,
    #[serde(default)]
    pub take_profit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewardRating {
    Good,
    Acceptable,
    Poor,
}

impl RewardRating {
    fn from_ratio(ratio: f64) -> Self {
        if ratio >= 2.0 {
            RewardRating::Good
        } else if ratio >= 1.0 {
            RewardRating::Acceptable
        } else {
            RewardRating::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RewardRatio {
    pub ratio: f64,
    pub rating: RewardRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionPlan {
    pub direction: Direction,
    pub dollar_risk: f64,
    pub stop_distance: f64,
    /// Units of the instrument; 0 when entry equals stop.
    pub position_size: f64,
    pub reward: Option<RewardRatio>,
}

impl PositionRequest {
    pub fn plan(&self) -> Result<PositionPlan, RiskError> {
        if !(self.account_size > 0.0) {
            return Err(RiskError::AccountSize);
        }
        if !(MIN_RISK_PERCENT..=MAX_RISK_PERCENT).contains(&self.risk_percent) {
            return Err(RiskError::RiskPercent);
        }
        if !(self.entry_price > 0.0 && self.stop_loss > 0.0) {
            return Err(RiskError::Prices);
        }

        let dollar_risk = self.account_size * (self.risk_percent / 100.0);
        let stop_distance = (self.entry_price - self.stop_loss).abs();
        let position_size = ratio_or_zero(dollar_risk, stop_distance);

        let direction = if self.entry_price > self.stop_loss {
            Direction::Long
        } else {
            Direction::Short
        };

        let reward = self.take_profit.map(|tp| {
            // Rated at the displayed precision so 1.99999... reads and rates as 2.00.
            let ratio = round_cents(ratio_or_zero((tp - self.entry_price).abs(), stop_distance));
            RewardRatio {
                ratio,
                rating: RewardRating::from_ratio(ratio),
            }
        });

        Ok(PositionPlan {
            direction,
            dollar_risk,
            stop_distance,
            position_size,
            reward,
        })
    }
}

fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
