//! Per-key cooldown cache.

use chrono::{DateTime, Duration, Utc};
use resonance_core::types::AlertKey;
use std::collections::HashMap;

/// Last confirmed send time per (symbol, action) key.
///
/// Lives for the process lifetime. Entries are only written after a
/// confirmed delivery.
#[derive(Debug, Clone)]
pub struct AlertCache {
    cooldown: Duration,
    last_sent: HashMap<AlertKey, DateTime<Utc>>,
}

impl AlertCache {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Change the window. Recorded send times are kept and measured
    /// against the new window from now on.
    pub fn set_cooldown(&mut self, cooldown: Duration) {
        self.cooldown = cooldown;
    }

    /// Time left before `key` may fire again, or `None` if it may fire now.
    pub fn remaining(&self, key: &AlertKey, now: DateTime<Utc>) -> Option<Duration> {
        let last = self.last_sent.get(key)?;
        let elapsed = now - *last;
        (elapsed < self.cooldown).then(|| self.cooldown - elapsed)
    }

    /// Record a confirmed send.
    pub fn record(&mut self, key: AlertKey, now: DateTime<Utc>) {
        self.last_sent.insert(key, now);
    }

    /// Last send time for `key`.
    pub fn last_sent(&self, key: &AlertKey) -> Option<DateTime<Utc>> {
        self.last_sent.get(key).copied()
    }

    /// Drop entries whose cooldown has fully elapsed.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cooldown = self.cooldown;
        self.last_sent.retain(|_, sent| now - *sent < cooldown);
    }

    pub fn len(&self) -> usize {
        self.last_sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_sent.is_empty()
    }
}
