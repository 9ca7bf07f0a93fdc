//! Directional signals and cross-interval resonance verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timeframe;

/// Direction of a signal or verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Bull,
    Bear,
    #[default]
    None,
}

impl Direction {
    /// True for BULL or BEAR.
    pub fn is_directional(&self) -> bool {
        !matches!(self, Direction::None)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Bull => "BULL",
            Direction::Bear => "BEAR",
            Direction::None => "NONE",
        };
        write!(f, "{}", s)
    }
}

/// Trend filter state from the EMA stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Bull,
    Bear,
    #[default]
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Bull => "BULL",
            Trend::Bear => "BEAR",
            Trend::Sideways => "SIDEWAYS",
        };
        write!(f, "{}", s)
    }
}

/// A sub-condition that contributed to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalReason {
    /// Trend-aligned price move on elevated volume.
    Threshold { percent_change: f64, volume_ratio: f64 },
    /// Close beyond the prior 5-bar high/low.
    Breakout { direction: Direction },
    /// MACD histogram flipped sign after a same-sign streak.
    MacdReversal { lookback: usize },
}

impl SignalReason {
    /// Short tag without the numeric detail.
    pub fn label(&self) -> &'static str {
        match self {
            SignalReason::Threshold { .. } => "trend/volume threshold",
            SignalReason::Breakout {
                direction: Direction::Bear,
            } => "5-bar breakdown",
            SignalReason::Breakout { .. } => "5-bar breakout",
            SignalReason::MacdReversal { .. } => "MACD reversal",
        }
    }
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalReason::Threshold {
                percent_change,
                volume_ratio,
            } => write!(
                f,
                "{} ({:+.2}%, {:.1}x vol)",
                self.label(),
                percent_change,
                volume_ratio
            ),
            SignalReason::Breakout { .. } => write!(f, "{}", self.label()),
            SignalReason::MacdReversal { lookback } => {
                write!(f, "{} after {} bars", self.label(), lookback)
            }
        }
    }
}

/// Classification of one (symbol, interval) for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Signal {
    pub direction: Direction,
    pub reasons: Vec<SignalReason>,
    pub trend: Trend,
}

impl Signal {
    /// A signal with nothing fired.
    pub fn none(trend: Trend) -> Self {
        Self {
            direction: Direction::None,
            reasons: Vec::new(),
            trend,
        }
    }

    /// Reasons joined for display.
    pub fn describe(&self) -> String {
        self.reasons
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Reasons reported by one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalReasons {
    pub timeframe: Timeframe,
    pub reasons: Vec<SignalReason>,
}

/// Combined verdict for a symbol across all configured intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceVerdict {
    pub symbol: String,
    pub direction: Direction,
    pub details: Vec<IntervalReasons>,
}

impl ResonanceVerdict {
    /// Headline label for the verdict.
    pub fn label(&self) -> &'static str {
        match self.direction {
            Direction::Bull => "bull acceleration",
            Direction::Bear => "bear acceleration",
            Direction::None => "observing",
        }
    }

    /// One line per contributing interval, e.g. `5m: 5-bar breakout`.
    pub fn describe(&self) -> String {
        self.details
            .iter()
            .map(|d| {
                let reasons = d
                    .reasons
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ");
                format!("{}: {}", d.timeframe, reasons)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
