//! Notifier that only writes to the log.

use async_trait::async_trait;
use resonance_core::error::NotifyError;
use resonance_core::traits::Notifier;
use resonance_core::types::Alert;
use tracing::info;

use crate::format::format_message;

/// Logs alerts instead of delivering them. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        info!(
            symbol = %alert.symbol,
            action = %alert.action.category(),
            "ALERT\n{}",
            format_message(alert)
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
