//! Alert payloads, dedup keys and price-level rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Direction, MarketContext, PivotLevels};

/// Comparison used by a price-level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelOperator {
    /// `>` or "crosses up": fires at or above the target.
    Above,
    /// `<` or "crosses down": fires at or below the target.
    Below,
}

impl fmt::Display for LevelOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelOperator::Above => write!(f, ">"),
            LevelOperator::Below => write!(f, "<"),
        }
    }
}

/// A typed `SYMBOL op target` rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevelRule {
    pub symbol: String,
    pub operator: LevelOperator,
    pub target: f64,
}

impl PriceLevelRule {
    /// Whether `price` is at or past the target.
    pub fn is_triggered(&self, price: f64) -> bool {
        match self.operator {
            LevelOperator::Above => price >= self.target,
            LevelOperator::Below => price <= self.target,
        }
    }
}

impl fmt::Display for PriceLevelRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.symbol, self.operator, self.target)
    }
}

/// What an alert is about. Each action maps to a dedup category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertAction {
    BullResonance,
    BearResonance,
    PriceLevel { operator: LevelOperator, target: f64 },
}

impl AlertAction {
    /// Action for a directional resonance verdict. `None` for NONE.
    pub fn from_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::Bull => Some(AlertAction::BullResonance),
            Direction::Bear => Some(AlertAction::BearResonance),
            Direction::None => None,
        }
    }

    /// Category used in the dedup key.
    pub fn category(&self) -> String {
        match self {
            AlertAction::BullResonance => "BULL_RESONANCE".to_string(),
            AlertAction::BearResonance => "BEAR_RESONANCE".to_string(),
            AlertAction::PriceLevel { operator, target } => {
                let op = match operator {
                    LevelOperator::Above => "ABOVE",
                    LevelOperator::Below => "BELOW",
                };
                format!("PRICE_LEVEL_{}_{}", op, target)
            }
        }
    }

    /// Human-readable headline.
    pub fn label(&self) -> String {
        match self {
            AlertAction::BullResonance => "Bull acceleration".to_string(),
            AlertAction::BearResonance => "Bear acceleration".to_string(),
            AlertAction::PriceLevel { operator, target } => {
                format!("Key level reached ({} {})", operator, target)
            }
        }
    }
}

/// Dedup key: (symbol, action category).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertKey {
    pub symbol: String,
    pub action: String,
}

impl AlertKey {
    pub fn new(symbol: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.symbol, self.action)
    }
}

/// A candidate alert handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub symbol: String,
    pub action: AlertAction,
    /// Multi-line detail text (per-interval reasons, rule text).
    pub details: String,
    pub price: f64,
    pub percent_change: f64,
    pub volume_ratio: f64,
    pub range_usage_pct: Option<f64>,
    pub pivots: Option<PivotLevels>,
    pub market: Option<MarketContext>,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn key(&self) -> AlertKey {
        AlertKey::new(self.symbol.clone(), self.action.category())
    }
}
