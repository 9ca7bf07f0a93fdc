//! Cooldown-gated alert dispatch.

use chrono::Duration;
use resonance_core::error::NotifyError;
use resonance_core::traits::{Clock, Notifier};
use resonance_core::types::Alert;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::AlertCache;

/// What happened to one candidate alert.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Delivered and recorded in the cache.
    Sent,
    /// Same key fired within the cooldown.
    Suppressed { remaining: Duration },
    /// Delivery failed; the cache was left untouched.
    Failed(NotifyError),
}

/// Owns the cooldown cache and the notifier.
pub struct AlertDispatcher {
    notifier: Box<dyn Notifier>,
    clock: Arc<dyn Clock>,
    cache: AlertCache,
    send_timeout: std::time::Duration,
}

impl AlertDispatcher {
    pub fn new(
        notifier: Box<dyn Notifier>,
        clock: Arc<dyn Clock>,
        cache: AlertCache,
        send_timeout: std::time::Duration,
    ) -> Self {
        Self {
            notifier,
            clock,
            cache,
            send_timeout,
        }
    }

    pub fn cache(&self) -> &AlertCache {
        &self.cache
    }

    pub fn notifier_name(&self) -> &str {
        self.notifier.name()
    }

    pub fn send_timeout(&self) -> std::time::Duration {
        self.send_timeout
    }

    /// Apply a reloaded cooldown without forgetting what was already sent.
    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cache.set_cooldown(cooldown);
    }

    pub fn set_send_timeout(&mut self, send_timeout: std::time::Duration) {
        self.send_timeout = send_timeout;
    }

    /// Send `alert` unless its key is cooling down.
    pub async fn dispatch(&mut self, alert: &Alert) -> DispatchOutcome {
        let key = alert.key();
        let now = self.clock.now();

        if let Some(remaining) = self.cache.remaining(&key, now) {
            debug!(%key, remaining_secs = remaining.num_seconds(), "Alert suppressed");
            return DispatchOutcome::Suppressed { remaining };
        }

        let result = match tokio::time::timeout(self.send_timeout, self.notifier.send(alert)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.send_timeout.as_millis() as u64)),
        };

        match result {
            Ok(()) => {
                self.cache.record(key.clone(), now);
                info!(%key, notifier = self.notifier.name(), "Alert sent");
                DispatchOutcome::Sent
            }
            Err(e) => {
                warn!(%key, error = %e, "Alert delivery failed");
                DispatchOutcome::Failed(e)
            }
        }
    }

    /// Forget keys whose cooldown has elapsed.
    pub fn prune(&mut self) {
        let now = self.clock.now();
        self.cache.prune(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use resonance_core::traits::ManualClock;
    use resonance_core::types::AlertAction;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeNotifier {
        sent: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
        delay: Option<std::time::Duration>,
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, _alert: &Alert) -> Result<(), NotifyError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(NotifyError::Connection("endpoint down".into()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn start() -> DateTime<chrono::Utc> {
        DateTime::from_timestamp(1_705_329_000, 0).unwrap()
    }

    fn alert(symbol: &str, action: AlertAction) -> Alert {
        Alert {
            symbol: symbol.to_string(),
            action,
            details: String::new(),
            price: 100.0,
            percent_change: 1.0,
            volume_ratio: 2.0,
            range_usage_pct: None,
            pivots: None,
            market: None,
            timestamp: start(),
        }
    }

    fn dispatcher(notifier: FakeNotifier, clock: Arc<ManualClock>) -> AlertDispatcher {
        AlertDispatcher::new(
            Box::new(notifier),
            clock,
            AlertCache::new(Duration::minutes(30)),
            std::time::Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_cooldown_window() {
        let sent = Arc::new(AtomicUsize::new(0));
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(
            FakeNotifier {
                sent: sent.clone(),
                ..Default::default()
            },
            clock.clone(),
        );
        let tsla = alert("TSLA", AlertAction::BullResonance);

        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);

        clock.advance(Duration::minutes(10));
        assert_eq!(
            dispatcher.dispatch(&tsla).await,
            DispatchOutcome::Suppressed {
                remaining: Duration::minutes(20)
            }
        );

        clock.advance(Duration::minutes(21));
        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);
        assert_eq!(sent.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_keys_throttle_independently() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(FakeNotifier::default(), clock);

        assert_eq!(
            dispatcher.dispatch(&alert("TSLA", AlertAction::BullResonance)).await,
            DispatchOutcome::Sent
        );
        assert_eq!(
            dispatcher.dispatch(&alert("TSLA", AlertAction::BearResonance)).await,
            DispatchOutcome::Sent
        );
        assert_eq!(
            dispatcher.dispatch(&alert("NVDA", AlertAction::BullResonance)).await,
            DispatchOutcome::Sent
        );
        assert!(matches!(
            dispatcher.dispatch(&alert("TSLA", AlertAction::BullResonance)).await,
            DispatchOutcome::Suppressed { .. }
        ));
        assert_eq!(dispatcher.cache().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_start_cooldown() {
        let failing = Arc::new(AtomicBool::new(true));
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(
            FakeNotifier {
                failing: failing.clone(),
                ..Default::default()
            },
            clock.clone(),
        );
        let tsla = alert("TSLA", AlertAction::BullResonance);

        assert!(matches!(
            dispatcher.dispatch(&tsla).await,
            DispatchOutcome::Failed(NotifyError::Connection(_))
        ));
        assert!(dispatcher.cache().is_empty());

        // Next cycle, endpoint recovered
        failing.store(false, Ordering::SeqCst);
        clock.advance(Duration::minutes(1));
        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);
    }

    #[tokio::test]
    async fn test_shorter_cooldown_releases_alert_sooner() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(FakeNotifier::default(), clock.clone());
        let tsla = alert("TSLA", AlertAction::BullResonance);

        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);

        clock.advance(Duration::minutes(6));
        assert!(matches!(
            dispatcher.dispatch(&tsla).await,
            DispatchOutcome::Suppressed { .. }
        ));

        dispatcher.set_cooldown(Duration::minutes(5));
        assert_eq!(dispatcher.cache().len(), 1);
        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);
    }

    #[tokio::test]
    async fn test_send_timeout_can_be_raised() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(
            FakeNotifier {
                delay: Some(std::time::Duration::from_millis(300)),
                ..Default::default()
            },
            clock,
        );
        let tsla = alert("TSLA", AlertAction::BullResonance);

        assert!(matches!(
            dispatcher.dispatch(&tsla).await,
            DispatchOutcome::Failed(NotifyError::Timeout(200))
        ));

        dispatcher.set_send_timeout(std::time::Duration::from_secs(2));
        assert_eq!(dispatcher.send_timeout(), std::time::Duration::from_secs(2));
        assert_eq!(dispatcher.dispatch(&tsla).await, DispatchOutcome::Sent);
    }

    #[tokio::test]
    async fn test_slow_notifier_times_out() {
        let clock = Arc::new(ManualClock::new(start()));
        let mut dispatcher = dispatcher(
            FakeNotifier {
                delay: Some(std::time::Duration::from_secs(5)),
                ..Default::default()
            },
            clock,
        );

        let outcome = dispatcher
            .dispatch(&alert("TSLA", AlertAction::BullResonance))
            .await;
        assert_eq!(outcome, DispatchOutcome::Failed(NotifyError::Timeout(200)));
        assert!(dispatcher.cache().is_empty());
    }
}
