//! Free-text price-level rules.
//!
//! Rules look like `TSLA > 400`, `nvda crosses down 118.5` or
//! `QQQ 升穿 520` (`升穿`/`跌穿` for crosses up/down) and are
//! separated by newlines or commas (ASCII or full-width). Anything that
//! does not parse is skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use resonance_core::error::RuleError;
use resonance_core::types::{LevelOperator, PriceLevelRule};
use tracing::debug;

static RULE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*([A-Z0-9][A-Z0-9.\-^=]*)\s*(>|<|crosses\s+up|crosses\s+down|升穿|跌穿)\s*(\d+(?:\.\d+)?)\s*$",
    )
    .expect("price rule pattern is valid")
});

/// Parse a single rule.
pub fn parse_rule(text: &str) -> Result<PriceLevelRule, RuleError> {
    let caps = RULE_PATTERN
        .captures(text)
        .ok_or_else(|| RuleError::Unrecognised(text.trim().to_string()))?;

    let symbol = caps[1].to_uppercase();
    let op = caps[2].to_lowercase();
    let operator = if op == ">" || op == "升穿" || op.ends_with("up") {
        LevelOperator::Above
    } else {
        LevelOperator::Below
    };

    let target: f64 = caps[3]
        .parse()
        .map_err(|_| RuleError::InvalidTarget(caps[3].to_string()))?;
    if !target.is_finite() || target <= 0.0 {
        return Err(RuleError::InvalidTarget(caps[3].to_string()));
    }

    Ok(PriceLevelRule {
        symbol,
        operator,
        target,
    })
}

/// Parse every rule in `text`, skipping malformed entries.
pub fn parse_rules(text: &str) -> Vec<PriceLevelRule> {
    text.split(['\n', ',', '，'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match parse_rule(line) {
            Ok(rule) => Some(rule),
            Err(e) => {
                debug!(error = %e, "Skipping price rule");
                None
            }
        })
        .collect()
}

/// Holds the parsed rules for one cycle.
#[derive(Debug, Clone, Default)]
pub struct PriceLevelWatcher {
    rules: Vec<PriceLevelRule>,
}

impl PriceLevelWatcher {
    pub fn new(rules: Vec<PriceLevelRule>) -> Self {
        Self { rules }
    }

    /// Parse `text` into a watcher.
    pub fn from_text(text: &str) -> Self {
        Self::new(parse_rules(text))
    }

    pub fn rules(&self) -> &[PriceLevelRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for `symbol` that `price` has reached.
    pub fn triggered<'a>(
        &'a self,
        symbol: &'a str,
        price: f64,
    ) -> impl Iterator<Item = &'a PriceLevelRule> + 'a {
        self.rules
            .iter()
            .filter(move |r| r.symbol.eq_ignore_ascii_case(symbol) && r.is_triggered(price))
    }
}
