//! Cycle report generation.

use chrono::{DateTime, Utc};
use resonance_alerts::DispatchOutcome;
use resonance_core::types::{
    Direction, MarketContext, ResonanceVerdict, Signal, Timeframe,
};
use resonance_signals::RangeAndLevelDiagnostics;
use serde::{Deserialize, Serialize};

/// Serializable form of a [`DispatchOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertStatus {
    Sent,
    Suppressed { remaining_secs: i64 },
    Failed { error: String },
}

impl From<&DispatchOutcome> for AlertStatus {
    fn from(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Sent => AlertStatus::Sent,
            DispatchOutcome::Suppressed { remaining } => AlertStatus::Suppressed {
                remaining_secs: remaining.num_seconds(),
            },
            DispatchOutcome::Failed(e) => AlertStatus::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// One candidate alert and what happened to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Dedup category, e.g. `BULL_RESONANCE`
    pub action: String,
    pub status: AlertStatus,
}

/// Signal for one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSignal {
    pub timeframe: Timeframe,
    pub signal: Signal,
}

/// A data problem that degraded one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalError {
    pub timeframe: Timeframe,
    pub error: String,
}

/// Everything the cycle learned about one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    /// Close of the first interval that produced a frame
    pub price: Option<f64>,
    pub percent_change: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub rsi: Option<f64>,
    pub signals: Vec<IntervalSignal>,
    pub verdict: ResonanceVerdict,
    pub diagnostics: RangeAndLevelDiagnostics,
    pub alerts: Vec<AlertRecord>,
    pub errors: Vec<IntervalError>,
}

/// Result of one pass over the watch-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub market: Option<MarketContext>,
    pub symbols: Vec<SymbolReport>,
}

impl CycleReport {
    fn count_alerts(&self, pred: impl Fn(&AlertStatus) -> bool) -> usize {
        self.symbols
            .iter()
            .flat_map(|s| s.alerts.iter())
            .filter(|a| pred(&a.status))
            .count()
    }

    pub fn alerts_sent(&self) -> usize {
        self.count_alerts(|s| matches!(s, AlertStatus::Sent))
    }

    pub fn alerts_suppressed(&self) -> usize {
        self.count_alerts(|s| matches!(s, AlertStatus::Suppressed { .. }))
    }

    pub fn alerts_failed(&self) -> usize {
        self.count_alerts(|s| matches!(s, AlertStatus::Failed { .. }))
    }

    /// Interval-level data errors across all symbols.
    pub fn error_count(&self) -> usize {
        self.symbols.iter().map(|s| s.errors.len()).sum()
    }

    /// Symbols with a directional verdict.
    pub fn directional(&self) -> impl Iterator<Item = &SymbolReport> {
        self.symbols
            .iter()
            .filter(|s| s.verdict.direction != Direction::None)
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                   RESONANCE SCAN REPORT                    \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!(
            "  Cycle:               {} ({} ms)\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            (self.finished_at - self.started_at).num_milliseconds()
        ));
        match &self.market {
            Some(m) => s.push_str(&format!("  Market:              {}\n", m)),
            None => s.push_str("  Market:              unavailable\n"),
        }
        s.push('\n');

        s.push_str("SYMBOLS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        for sym in &self.symbols {
            let price = sym
                .price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "-".to_string());
            let change = sym
                .percent_change
                .map(|c| format!("{:+.2}%", c))
                .unwrap_or_else(|| "-".to_string());
            let volume = sym
                .volume_ratio
                .map(|v| format!("{:.1}x", v))
                .unwrap_or_else(|| "-".to_string());

            s.push_str(&format!(
                "  {:<8} {:>10} {:>8} {:>6}  {}\n",
                sym.symbol,
                price,
                change,
                volume,
                sym.verdict.label()
            ));

            let trends = sym
                .signals
                .iter()
                .map(|i| format!("{} {}/{}", i.timeframe, i.signal.direction, i.signal.trend))
                .collect::<Vec<_>>()
                .join("  ");
            if !trends.is_empty() {
                s.push_str(&format!("           {}\n", trends));
            }
            if sym.verdict.direction.is_directional() {
                for line in sym.verdict.describe().lines() {
                    s.push_str(&format!("           {}\n", line));
                }
            }
            s.push_str(&format!("           {}\n", sym.diagnostics.summary()));
            for err in &sym.errors {
                s.push_str(&format!("           ! {}: {}\n", err.timeframe, err.error));
            }
        }
        s.push('\n');

        s.push_str("ALERTS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sent:                {}\n", self.alerts_sent()));
        s.push_str(&format!("  Suppressed:          {}\n", self.alerts_suppressed()));
        s.push_str(&format!("  Failed:              {}\n", self.alerts_failed()));
        s.push_str(&format!("  Data Errors:         {}\n", self.error_count()));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
