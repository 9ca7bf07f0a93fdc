//! Alert message text.

use resonance_core::types::{Alert, RangeBand};

/// Render the plain-text body sent to the messaging endpoint.
pub fn format_message(alert: &Alert) -> String {
    let range = match alert.range_usage_pct {
        Some(pct) => format!("{:.1}% ({})", pct, RangeBand::classify(pct)),
        None => "N/A".to_string(),
    };
    let levels = match &alert.pivots {
        Some(p) => format!("P {:.2} | R1 {:.2} | S1 {:.2}", p.pivot, p.resistance1, p.support1),
        None => "N/A".to_string(),
    };
    let market = match &alert.market {
        Some(m) => m.to_string(),
        None => "N/A".to_string(),
    };

    format!(
        "{}: {}\n\
         Price: {:.2} ({:+.2}%)\n\
         Volume: {:.1}x | ADR: {}\n\
         Levels: {}\n\
         Market: {}\n\
         Details:\n{}\n\
         Time: {}",
        alert.action.label(),
        alert.symbol,
        alert.price,
        alert.percent_change,
        alert.volume_ratio,
        range,
        levels,
        market,
        alert.details,
        alert.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
