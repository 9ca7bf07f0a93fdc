//! Poll-cycle engine.

use resonance_alerts::AlertDispatcher;
use resonance_core::error::DataError;
use resonance_core::traits::{Clock, DataSource};
use resonance_core::types::{
    Alert, AlertAction, BarSeries, MarketContext, Signal, Timeframe, Trend,
};
use resonance_indicators::IndicatorFrame;
use resonance_signals::{
    market_context, PriceLevelWatcher, RangeAndLevelDiagnostics, ResonanceAggregator,
    ResonanceMode, SignalClassifier, SignalConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::report::{AlertRecord, CycleReport, IntervalError, IntervalSignal, SymbolReport};

/// Calendar days of daily history for range and pivot diagnostics.
pub const DAILY_LOOKBACK_DAYS: u32 = 20;
/// Calendar days of daily history for the market backdrop.
pub const MARKET_LOOKBACK_DAYS: u32 = 5;

/// Volatility index and benchmark used for the market backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSymbols {
    pub volatility: String,
    pub benchmark: String,
}

impl Default for MarketSymbols {
    fn default() -> Self {
        Self {
            volatility: "^VIX".to_string(),
            benchmark: "SPY".to_string(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Watch-list
    pub symbols: Vec<String>,
    /// Intervals, fastest first
    pub intervals: Vec<Timeframe>,
    /// Classifier rules
    pub signal: SignalConfig,
    /// Resonance policy
    pub resonance: ResonanceMode,
    /// Bound on each bar fetch
    pub fetch_timeout: Duration,
    /// Fixed intraday lookback; per-interval defaults when `None`
    pub lookback_days: Option<u32>,
    /// Market backdrop symbols; skipped when `None`
    pub market: Option<MarketSymbols>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["TSLA".into(), "NVDA".into(), "AAPL".into(), "QQQ".into()],
            intervals: vec![Timeframe::Minute5, Timeframe::Minute15],
            signal: SignalConfig::default(),
            resonance: ResonanceMode::default(),
            fetch_timeout: Duration::from_secs(10),
            lookback_days: None,
            market: Some(MarketSymbols::default()),
        }
    }
}

/// Drives one evaluation pass over the watch-list.
pub struct Engine {
    config: EngineConfig,
    source: Arc<dyn DataSource>,
    dispatcher: AlertDispatcher,
    clock: Arc<dyn Clock>,
    classifier: SignalClassifier,
    aggregator: ResonanceAggregator,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn DataSource>,
        dispatcher: AlertDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let classifier = SignalClassifier::new(config.signal.clone());
        let aggregator = ResonanceAggregator::new(config.resonance);
        Self {
            config,
            source,
            dispatcher,
            clock,
            classifier,
            aggregator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut AlertDispatcher {
        &mut self.dispatcher
    }

    /// Swap in a reloaded configuration. The cooldown cache is kept.
    pub fn update_config(&mut self, config: EngineConfig) {
        self.classifier = SignalClassifier::new(config.signal.clone());
        self.aggregator = ResonanceAggregator::new(config.resonance);
        self.config = config;
    }

    /// Run one pass over every configured symbol.
    pub async fn run_cycle(&mut self, rules: &PriceLevelWatcher) -> CycleReport {
        let started_at = self.clock.now();
        info!(
            symbols = self.config.symbols.len(),
            intervals = self.config.intervals.len(),
            rules = rules.rules().len(),
            "Starting cycle"
        );

        let market = self.fetch_market_context().await;

        let symbols = self.config.symbols.clone();
        let mut reports = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            let report = self.evaluate_symbol(symbol, market.as_ref(), rules).await;
            reports.push(report);
        }

        self.dispatcher.prune();

        let report = CycleReport {
            started_at,
            finished_at: self.clock.now(),
            market,
            symbols: reports,
        };
        info!(
            sent = report.alerts_sent(),
            suppressed = report.alerts_suppressed(),
            failed = report.alerts_failed(),
            errors = report.error_count(),
            "Cycle complete"
        );
        report
    }

    async fn evaluate_symbol(
        &mut self,
        symbol: &str,
        market: Option<&MarketContext>,
        rules: &PriceLevelWatcher,
    ) -> SymbolReport {
        let mut signals: Vec<(Timeframe, Signal)> = Vec::with_capacity(self.config.intervals.len());
        let mut errors = Vec::new();
        let mut frames = Vec::with_capacity(self.config.intervals.len());

        let intervals = self.config.intervals.clone();
        for &timeframe in &intervals {
            let lookback = self
                .config
                .lookback_days
                .unwrap_or_else(|| timeframe.default_lookback_days());

            match self.fetch_series(symbol, timeframe, lookback).await {
                Ok(series) => frames.push((timeframe, Some(IndicatorFrame::new(series)))),
                Err(e) => {
                    warn!(symbol, %timeframe, error = %e, "Interval unavailable");
                    errors.push(IntervalError {
                        timeframe,
                        error: e.to_string(),
                    });
                    frames.push((timeframe, None));
                }
            }
        }

        // The first interval that produced a frame supplies the current price.
        let mut headline: Option<&IndicatorFrame> = None;
        for (timeframe, frame) in &frames {
            let signal = match frame {
                Some(frame) => {
                    if headline.is_none() {
                        headline = Some(frame);
                    }
                    match frame.ensure_sufficient() {
                        Ok(()) => self.classifier.classify(frame),
                        Err(e) => {
                            debug!(symbol, %timeframe, error = %e, "Treating interval as NONE");
                            errors.push(IntervalError {
                                timeframe: *timeframe,
                                error: e.to_string(),
                            });
                            Signal::none(Trend::Sideways)
                        }
                    }
                }
                None => Signal::none(Trend::Sideways),
            };
            signals.push((*timeframe, signal));
        }

        let verdict = self.aggregator.aggregate(symbol, &signals);

        let diagnostics = match self
            .fetch_series(symbol, Timeframe::Daily, DAILY_LOOKBACK_DAYS)
            .await
        {
            Ok(daily) => RangeAndLevelDiagnostics::from_daily(&daily),
            Err(e) => {
                warn!(symbol, error = %e, "Daily bars unavailable");
                errors.push(IntervalError {
                    timeframe: Timeframe::Daily,
                    error: e.to_string(),
                });
                RangeAndLevelDiagnostics::default()
            }
        };

        let price = headline.and_then(|f| f.last_bar()).map(|b| b.close);
        let percent_change = headline.and_then(|f| f.percent_change());
        let volume_ratio = headline.map(|f| f.volume_ratio());
        let rsi = headline.and_then(|f| f.last_rsi());

        let mut alerts = Vec::new();
        if let Some(price) = price {
            let now = self.clock.now();
            let make_alert = |action: AlertAction, details: String| Alert {
                symbol: symbol.to_string(),
                action,
                details,
                price,
                percent_change: percent_change.unwrap_or(0.0),
                volume_ratio: volume_ratio.unwrap_or(1.0),
                range_usage_pct: diagnostics.percent_used(),
                pivots: diagnostics.pivots,
                market: market.cloned(),
                timestamp: now,
            };

            if let Some(action) = AlertAction::from_direction(verdict.direction) {
                info!(symbol, direction = %verdict.direction, "Resonance");
                let alert = make_alert(action, verdict.describe());
                alerts.push(self.dispatch(&alert).await);
            }

            for rule in rules.triggered(symbol, price) {
                info!(symbol, rule = %rule, price, "Price level reached");
                let action = AlertAction::PriceLevel {
                    operator: rule.operator,
                    target: rule.target,
                };
                let alert = make_alert(action, rule.to_string());
                alerts.push(self.dispatch(&alert).await);
            }
        }

        SymbolReport {
            symbol: symbol.to_string(),
            price,
            percent_change,
            volume_ratio,
            rsi,
            signals: signals
                .into_iter()
                .map(|(timeframe, signal)| IntervalSignal { timeframe, signal })
                .collect(),
            verdict,
            diagnostics,
            alerts,
            errors,
        }
    }

    async fn dispatch(&mut self, alert: &Alert) -> AlertRecord {
        let outcome = self.dispatcher.dispatch(alert).await;
        AlertRecord {
            action: alert.action.category(),
            status: (&outcome).into(),
        }
    }

    /// Fetch bars under the configured timeout and validate them.
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<BarSeries, DataError> {
        let bars = tokio::time::timeout(
            self.config.fetch_timeout,
            self.source.get_bars(symbol, timeframe, lookback_days),
        )
        .await
        .map_err(|_| DataError::Timeout(self.config.fetch_timeout.as_millis() as u64))??;

        BarSeries::from_bars(symbol, timeframe, bars)
    }

    async fn fetch_market_context(&self) -> Option<MarketContext> {
        let symbols = self.config.market.as_ref()?;

        let volatility = self
            .fetch_series(&symbols.volatility, Timeframe::Daily, MARKET_LOOKBACK_DAYS)
            .await;
        let benchmark = self
            .fetch_series(&symbols.benchmark, Timeframe::Daily, MARKET_LOOKBACK_DAYS)
            .await;

        match (volatility, benchmark) {
            (Ok(v), Ok(b)) => market_context(&v, &b),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Market context unavailable");
                None
            }
        }
    }
}
