//! Alert transport trait.

use crate::error::NotifyError;
use crate::types::Alert;
use async_trait::async_trait;

/// Trait for outbound alert delivery.
///
/// `Ok(())` means the endpoint confirmed delivery. Only then does the
/// dispatcher start the cooldown for the alert's key.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert.
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Get the notifier name.
    fn name(&self) -> &str;
}
