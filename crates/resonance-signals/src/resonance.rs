//! Cross-interval resonance policies.

use resonance_core::error::ResonanceError;
use resonance_core::types::{
    Direction, IntervalReasons, ResonanceVerdict, Signal, Timeframe, Trend,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How per-interval signals combine into one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ResonanceMode {
    /// Every interval must agree on the direction.
    #[default]
    Unanimous,
    /// The first (fastest) interval's signal confirmed by the last
    /// (slowest) interval's trend.
    FastSignalSlowTrend,
}

impl ResonanceMode {
    pub fn name(&self) -> &'static str {
        match self {
            ResonanceMode::Unanimous => "unanimous",
            ResonanceMode::FastSignalSlowTrend => "fast_signal_slow_trend",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResonanceMode::Unanimous => "All intervals report the same direction",
            ResonanceMode::FastSignalSlowTrend => {
                "Fastest interval signals, slowest interval trend agrees"
            }
        }
    }
}

impl fmt::Display for ResonanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ResonanceMode {
    type Err = ResonanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unanimous" | "all" => Ok(ResonanceMode::Unanimous),
            "fast_signal_slow_trend" | "signal_trend" => Ok(ResonanceMode::FastSignalSlowTrend),
            other => Err(ResonanceError::Config(format!(
                "Unknown resonance mode: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for ResonanceMode {
    type Error = ResonanceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Combines ordered per-interval signals for one symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResonanceAggregator {
    mode: ResonanceMode,
}

impl ResonanceAggregator {
    pub fn new(mode: ResonanceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResonanceMode {
        self.mode
    }

    /// Aggregate signals given in configured interval order.
    pub fn aggregate(&self, symbol: &str, signals: &[(Timeframe, Signal)]) -> ResonanceVerdict {
        let direction = match self.mode {
            ResonanceMode::Unanimous => unanimous(signals),
            ResonanceMode::FastSignalSlowTrend => fast_signal_slow_trend(signals),
        };

        let details = signals
            .iter()
            .filter(|(_, signal)| signal.direction.is_directional())
            .map(|(timeframe, signal)| IntervalReasons {
                timeframe: *timeframe,
                reasons: signal.reasons.clone(),
            })
            .collect();

        ResonanceVerdict {
            symbol: symbol.to_string(),
            direction,
            details,
        }
    }
}

fn unanimous(signals: &[(Timeframe, Signal)]) -> Direction {
    let Some((_, first)) = signals.first() else {
        return Direction::None;
    };
    let candidate = first.direction;
    if candidate.is_directional() && signals.iter().all(|(_, s)| s.direction == candidate) {
        candidate
    } else {
        Direction::None
    }
}

fn fast_signal_slow_trend(signals: &[(Timeframe, Signal)]) -> Direction {
    let (Some((_, fast)), Some((_, slow))) = (signals.first(), signals.last()) else {
        return Direction::None;
    };
    match (fast.direction, slow.trend) {
        (Direction::Bull, Trend::Bull) => Direction::Bull,
        (Direction::Bear, Trend::Bear) => Direction::Bear,
        _ => Direction::None,
    }
}
