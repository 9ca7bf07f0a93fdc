//! Timeframe (bar interval) definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timeframe for bars/candles.
///
/// Serializes to the short names; deserializes through [`FromStr`], so the
/// aliases it accepts (`5min`, `60m`, `daily`, ...) work in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum Timeframe {
    /// 1 minute bars
    #[serde(rename = "1m")]
    Minute1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    #[default]
    Minute5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    Minute15,
    /// 30 minute bars
    #[serde(rename = "30m")]
    Minute30,
    /// 1 hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars
    #[serde(rename = "1d")]
    Daily,
}

impl Timeframe {
    /// Check if this is an intraday timeframe.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Timeframe::Daily)
    }

    /// How many calendar days of history to request for this timeframe.
    ///
    /// Sized so that a regular session yields more than 200 bars, while
    /// staying inside common provider limits (7 days of 1m bars, 60 days of
    /// sub-hourly bars).
    pub fn default_lookback_days(&self) -> u32 {
        match self {
            Timeframe::Minute1 | Timeframe::Minute5 => 7,
            Timeframe::Minute15 | Timeframe::Minute30 => 60,
            Timeframe::Hour1 => 180,
            Timeframe::Daily => 30,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Minute5 => "5m",
            Timeframe::Minute15 => "15m",
            Timeframe::Minute30 => "30m",
            Timeframe::Hour1 => "1h",
            Timeframe::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1min" | "minute" => Ok(Timeframe::Minute1),
            "5m" | "5min" => Ok(Timeframe::Minute5),
            "15m" | "15min" => Ok(Timeframe::Minute15),
            "30m" | "30min" => Ok(Timeframe::Minute30),
            "1h" | "60m" | "1hour" | "hour" => Ok(Timeframe::Hour1),
            "1d" | "day" | "daily" => Ok(Timeframe::Daily),
            _ => Err(format!("Invalid timeframe: {}", s)),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::from_str("1m").unwrap(), Timeframe::Minute1);
        assert_eq!(Timeframe::from_str(" 15M ").unwrap(), Timeframe::Minute15);
        assert_eq!(Timeframe::from_str("daily").unwrap(), Timeframe::Daily);
        assert!(Timeframe::from_str("2w").is_err());
    }

    #[test]
    fn test_timeframe_display_roundtrip() {
        for tf in [
            Timeframe::Minute1,
            Timeframe::Minute5,
            Timeframe::Minute15,
            Timeframe::Minute30,
            Timeframe::Hour1,
            Timeframe::Daily,
        ] {
            assert_eq!(Timeframe::from_str(&tf.to_string()).unwrap(), tf);
        }
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&Timeframe::Minute30).unwrap();
        assert_eq!(json, "\"30m\"");
        let tf: Timeframe = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(tf, Timeframe::Daily);

        let aliases: Vec<Timeframe> = serde_json::from_str(r#"["5min", "60m"]"#).unwrap();
        assert_eq!(aliases, vec![Timeframe::Minute5, Timeframe::Hour1]);
        assert!(serde_json::from_str::<Timeframe>("\"2w\"").is_err());
    }

    #[test]
    fn test_lookback_covers_slow_ema() {
        assert!(Timeframe::Minute1.default_lookback_days() <= 7);
        assert!(Timeframe::Minute30.default_lookback_days() <= 60);
        assert!(!Timeframe::Daily.is_intraday());
    }
}
