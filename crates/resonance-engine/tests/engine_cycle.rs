//! End-to-end cycles against in-memory bars and a recording notifier.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use resonance_alerts::{AlertCache, AlertDispatcher};
use resonance_core::error::{DataError, NotifyError};
use resonance_core::traits::{DataSource, ManualClock, Notifier};
use resonance_core::types::{Alert, Bar, Direction, Timeframe, VolatilityRegime};
use resonance_engine::{AlertStatus, Engine, EngineConfig, MarketSymbols};
use resonance_signals::{PriceLevelWatcher, ResonanceMode, SignalConfig};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const FIVE_MIN_MS: i64 = 300_000;
const DAY_MS: i64 = 86_400_000;

#[derive(Default)]
struct FakeSource {
    bars: HashMap<(String, Timeframe), Vec<Bar>>,
    slow: Option<std::time::Duration>,
}

impl FakeSource {
    fn with(mut self, symbol: &str, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        self.bars.insert((symbol.to_string(), timeframe), bars);
        self
    }
}

#[async_trait]
impl DataSource for FakeSource {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        _lookback_days: u32,
    ) -> Result<Vec<Bar>, DataError> {
        if let Some(delay) = self.slow {
            tokio::time::sleep(delay).await;
        }
        self.bars
            .get(&(symbol.to_string(), timeframe))
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Alert>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Alert> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Connection("connection refused".into()));
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// 240 rising 5m bars; with `spike` the last bar closes +1.2% on 1.8x volume.
fn intraday(start: f64, spike: bool) -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..240)
        .map(|i| {
            let c = start + i as f64 * 0.05;
            Bar::new(i as i64 * FIVE_MIN_MS, c, c + 0.1, c - 0.1, c, 1_000.0)
        })
        .collect();
    if spike {
        let n = bars.len();
        let prev = bars[n - 2].close;
        let close = prev * 1.012;
        bars[n - 1] = Bar::new(bars[n - 1].timestamp, prev, close, prev, close, 34_200.0 / 18.2);
    }
    bars
}

/// 14 completed days averaging a 5.0 range, then today at 6.0.
fn daily() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..14)
        .map(|i| {
            let range = if i % 2 == 0 { 4.0 } else { 6.0 };
            Bar::new(i * DAY_MS, 102.0, 100.0 + range, 100.0, 102.0, 1e6)
        })
        .collect();
    bars.push(Bar::new(14 * DAY_MS, 103.0, 106.0, 100.0, 103.0, 1e6));
    bars
}

fn closes(values: &[f64]) -> Vec<Bar> {
    values
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * DAY_MS, c, c, c, c, 0.0))
        .collect()
}

fn aapl_source() -> FakeSource {
    FakeSource::default()
        .with("AAPL", Timeframe::Minute5, intraday(100.0, true))
        .with("AAPL", Timeframe::Daily, daily())
        .with("^VIX", Timeframe::Daily, closes(&[22.0, 18.5]))
        .with("SPY", Timeframe::Daily, closes(&[500.0, 502.0]))
}

fn threshold_only() -> SignalConfig {
    SignalConfig {
        price_change_pct: 1.0,
        volume_ratio: 1.5,
        breakout: false,
        macd_reversal: false,
        reversal_lookback: 7,
    }
}

fn config(symbols: &[&str], intervals: &[Timeframe]) -> EngineConfig {
    EngineConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        intervals: intervals.to_vec(),
        signal: threshold_only(),
        resonance: ResonanceMode::Unanimous,
        fetch_timeout: std::time::Duration::from_secs(2),
        lookback_days: None,
        market: Some(MarketSymbols::default()),
    }
}

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_705_329_000, 0).unwrap()
}

fn engine(
    config: EngineConfig,
    source: FakeSource,
    notifier: RecordingNotifier,
    clock: Arc<ManualClock>,
) -> Engine {
    let dispatcher = AlertDispatcher::new(
        Box::new(notifier),
        clock.clone(),
        AlertCache::new(Duration::minutes(30)),
        std::time::Duration::from_secs(1),
    );
    Engine::new(config, Arc::new(source), dispatcher, clock)
}

#[tokio::test]
async fn aapl_threshold_signal_resonates_and_alerts() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let mut engine = engine(
        config(&["AAPL"], &[Timeframe::Minute5]),
        aapl_source(),
        notifier.clone(),
        clock,
    );

    let report = engine.run_cycle(&PriceLevelWatcher::default()).await;

    let aapl = &report.symbols[0];
    assert_eq!(aapl.signals.len(), 1);
    assert_eq!(aapl.signals[0].signal.direction, Direction::Bull);
    assert_eq!(aapl.signals[0].signal.reasons.len(), 1);
    assert_eq!(
        aapl.signals[0].signal.reasons[0].label(),
        "trend/volume threshold"
    );
    assert_eq!(aapl.verdict.direction, Direction::Bull);
    assert!(aapl.errors.is_empty());
    assert!((aapl.percent_change.unwrap() - 1.2).abs() < 1e-6);
    assert!((aapl.volume_ratio.unwrap() - 1.8).abs() < 1e-9);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let alert = &sent[0];
    assert_eq!(alert.key().action, "BULL_RESONANCE");
    assert_eq!(alert.details, "5m: trend/volume threshold (+1.20%, 1.8x vol)");
    assert!((alert.range_usage_pct.unwrap() - 120.0).abs() < 1e-9);
    assert!(alert.pivots.is_some());

    let market = alert.market.clone().unwrap();
    assert_eq!(market.volatility_symbol, "^VIX");
    assert_eq!(market.benchmark_symbol, "SPY");
    assert_eq!(market.volatility, 18.5);
    assert!((market.benchmark_change_pct - 0.4).abs() < 1e-9);
    assert_eq!(market.regime, VolatilityRegime::Calm);
    assert_eq!(report.market, Some(market));
    assert_eq!(report.alerts_sent(), 1);
}

#[tokio::test]
async fn repeated_cycles_respect_cooldown() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let mut engine = engine(
        config(&["AAPL"], &[Timeframe::Minute5]),
        aapl_source(),
        notifier.clone(),
        clock.clone(),
    );
    let rules = PriceLevelWatcher::default();

    engine.run_cycle(&rules).await;

    clock.advance(Duration::minutes(10));
    let second = engine.run_cycle(&rules).await;
    assert_eq!(
        second.symbols[0].alerts[0].status,
        AlertStatus::Suppressed {
            remaining_secs: 20 * 60
        }
    );

    clock.advance(Duration::minutes(21));
    let third = engine.run_cycle(&rules).await;
    assert_eq!(third.symbols[0].alerts[0].status, AlertStatus::Sent);
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn failed_delivery_is_retried_next_cycle() {
    let notifier = RecordingNotifier::default();
    notifier.failing.store(true, Ordering::SeqCst);
    let clock = Arc::new(ManualClock::new(start()));
    let mut engine = engine(
        config(&["AAPL"], &[Timeframe::Minute5]),
        aapl_source(),
        notifier.clone(),
        clock.clone(),
    );
    let rules = PriceLevelWatcher::default();

    let first = engine.run_cycle(&rules).await;
    assert!(matches!(
        first.symbols[0].alerts[0].status,
        AlertStatus::Failed { .. }
    ));
    assert_eq!(first.alerts_failed(), 1);

    notifier.failing.store(false, Ordering::SeqCst);
    clock.advance(Duration::minutes(1));
    let second = engine.run_cycle(&rules).await;
    assert_eq!(second.symbols[0].alerts[0].status, AlertStatus::Sent);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn missing_symbol_does_not_stop_the_cycle() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let mut engine = engine(
        config(&["ZZZZ", "AAPL"], &[Timeframe::Minute5]),
        aapl_source(),
        notifier.clone(),
        clock,
    );

    let report = engine.run_cycle(&PriceLevelWatcher::default()).await;

    let missing = &report.symbols[0];
    assert_eq!(missing.symbol, "ZZZZ");
    assert_eq!(missing.verdict.direction, Direction::None);
    assert!(missing.price.is_none());
    assert!(missing.alerts.is_empty());
    // 5m and daily both failed
    assert_eq!(missing.errors.len(), 2);

    assert_eq!(report.symbols[1].verdict.direction, Direction::Bull);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn short_history_is_insufficient() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let short = intraday(100.0, true)[100..].to_vec();
    let source = aapl_source().with("AAPL", Timeframe::Minute5, short);
    let mut engine = engine(
        config(&["AAPL"], &[Timeframe::Minute5]),
        source,
        notifier.clone(),
        clock,
    );

    let report = engine.run_cycle(&PriceLevelWatcher::default()).await;
    let aapl = &report.symbols[0];

    assert_eq!(aapl.verdict.direction, Direction::None);
    assert!(aapl.price.is_some());
    assert_eq!(aapl.errors.len(), 1);
    assert!(aapl.errors[0].error.contains("Insufficient history"));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn price_levels_fire_per_level() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let mut config = config(&["AAPL"], &[Timeframe::Minute5]);
    config.signal.price_change_pct = 5.0;
    let mut engine = engine(config, aapl_source(), notifier.clone(), clock);

    // Last close is about 113.29
    let rules = PriceLevelWatcher::from_text("AAPL > 110, aapl < 120\nAAPL > 200\nNVDA > 1");
    let report = engine.run_cycle(&rules).await;

    let aapl = &report.symbols[0];
    assert_eq!(aapl.verdict.direction, Direction::None);
    let actions: Vec<&str> = aapl.alerts.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(actions, vec!["PRICE_LEVEL_ABOVE_110", "PRICE_LEVEL_BELOW_120"]);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].details, "AAPL > 110");

    // Same rules next cycle are throttled per level
    let again = engine.run_cycle(&rules).await;
    assert_eq!(again.alerts_suppressed(), 2);
}

#[tokio::test]
async fn resonance_policy_is_selectable() {
    let source = aapl_source().with("AAPL", Timeframe::Minute15, intraday(100.0, false));
    let clock = Arc::new(ManualClock::new(start()));
    let intervals = [Timeframe::Minute5, Timeframe::Minute15];

    let mut unanimous = engine(
        config(&["AAPL"], &intervals),
        source,
        RecordingNotifier::default(),
        clock.clone(),
    );
    let report = unanimous.run_cycle(&PriceLevelWatcher::default()).await;
    assert_eq!(report.symbols[0].verdict.direction, Direction::None);

    let mut mixed_config = config(&["AAPL"], &intervals);
    mixed_config.resonance = ResonanceMode::FastSignalSlowTrend;
    unanimous.update_config(mixed_config);
    let report = unanimous.run_cycle(&PriceLevelWatcher::default()).await;
    assert_eq!(report.symbols[0].verdict.direction, Direction::Bull);
    assert_eq!(report.symbols[0].verdict.details.len(), 1);
}

#[tokio::test]
async fn slow_source_times_out() {
    let notifier = RecordingNotifier::default();
    let clock = Arc::new(ManualClock::new(start()));
    let mut source = aapl_source();
    source.slow = Some(std::time::Duration::from_millis(500));
    let mut config = config(&["AAPL"], &[Timeframe::Minute5]);
    config.fetch_timeout = std::time::Duration::from_millis(20);
    config.market = None;
    let mut engine = engine(config, source, notifier.clone(), clock);

    let report = engine.run_cycle(&PriceLevelWatcher::default()).await;
    let aapl = &report.symbols[0];

    assert_eq!(aapl.verdict.direction, Direction::None);
    assert!(aapl.errors.iter().all(|e| e.error.contains("timed out")));
    assert!(report.market.is_none());
    assert!(notifier.sent().is_empty());
}
