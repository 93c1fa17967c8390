//! Signal Engine
//!
//! Coordinates the pipeline stages: novelty filter, strategy
//! validation, bias classification, composite scoring and profile
//! selection. Also owns the ingestion loop and the scheduled benchmark
//! run with its advisory execution slot.

use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    BenchmarkSeries, BiasContext, Direction, MarketZone, RawEvent, Rejection, ScoredSignal,
    Timeframe,
};
use crate::ports::bias::BiasProvider;
use crate::ports::market_data::{DailyBiasPort, PriceHistoryPort};
use crate::ports::sink::{OutputSink, SinkError};
use crate::strategy::benchmark::{BenchmarkError, BenchmarkTracker};
use crate::strategy::classifier::classify;
use crate::strategy::novelty::{HistorySnapshot, NoveltyFilter};
use crate::strategy::params::{
    BenchmarkConfig, NoveltyConfig, ParamsError, ScoringConfig, ValidatorConfig,
};
use crate::strategy::profiles::ProfileSelector;
use crate::strategy::scorer::CompositeScorer;
use crate::strategy::validator::SignalValidator;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result of evaluating a batch: ideas ranked best-first plus every
/// rejection with the ticker it belonged to
#[derive(Debug, Default)]
pub struct RankedIdeas {
    pub ideas: Vec<ScoredSignal>,
    pub rejections: Vec<(String, Rejection)>,
}

/// Status snapshot of the engine
#[derive(Debug, Clone)]
pub struct EngineStatus {
    pub is_running: bool,
    pub tracked_tickers: usize,
}

/// Main pipeline coordinator.
///
/// All stages are synchronous and state-local; the only shared mutable
/// state is the novelty filter's alert history, which sits behind a
/// write lock spanning the whole read-prune-append sequence.
pub struct SignalEngine {
    filter: Arc<RwLock<NoveltyFilter>>,
    validator: SignalValidator,
    scorer: CompositeScorer,
    profiles: ProfileSelector,
    tracker: Arc<BenchmarkTracker>,
    bias: Arc<dyn BiasProvider>,
    sink: Arc<dyn OutputSink>,
    benchmark_slot: Arc<Mutex<()>>,
    is_running: Arc<RwLock<bool>>,
    timeframe: Timeframe,
}

impl SignalEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        novelty: NoveltyConfig,
        validator: ValidatorConfig,
        scoring: ScoringConfig,
        profiles: ProfileSelector,
        benchmark: BenchmarkConfig,
        bias: Arc<dyn BiasProvider>,
        prices: Arc<dyn PriceHistoryPort>,
        bias_days: Arc<dyn DailyBiasPort>,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Self, ParamsError> {
        novelty.validate()?;
        scoring.validate()?;
        benchmark.validate()?;
        let validator = SignalValidator::new(validator)?;
        let tracker = Arc::new(BenchmarkTracker::new(benchmark, prices, bias_days));

        Ok(Self {
            filter: Arc::new(RwLock::new(NoveltyFilter::new(novelty))),
            validator,
            scorer: CompositeScorer::new(scoring),
            profiles,
            tracker,
            bias,
            sink,
            benchmark_slot: Arc::new(Mutex::new(())),
            is_running: Arc::new(RwLock::new(false)),
            timeframe: Timeframe::Daily,
        })
    }

    /// Timeframe used when asking the bias provider for context
    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    /// Run one event through the full pipeline.
    ///
    /// Bias context and zone are supplied by the caller; no stage does
    /// I/O. Returns either a scored idea or the first stage rejection.
    pub async fn evaluate(
        &self,
        event: &RawEvent,
        bias: &BiasContext,
        zone: MarketZone,
    ) -> Result<ScoredSignal, Rejection> {
        let outcome = {
            let mut filter = self.filter.write().await;
            filter.passes(event)
        };
        if !outcome.passed {
            let reason = outcome.reason.unwrap_or_else(|| "rejected".to_string());
            debug!(ticker = %event.ticker, %reason, "event dropped by novelty filter");
            return Err(Rejection::filter(reason));
        }

        let validation = self.validator.validate(event);
        if !validation.passed {
            debug!(ticker = %event.ticker, reason = %validation.reason, "event failed validation");
            return Err(Rejection::validation(validation.reason));
        }

        // Validation guarantees these are present
        let adx = event.adx.unwrap_or(0.0);
        let separation = event.line_separation.unwrap_or(0.0);

        let category = classify(event.direction, bias.level, bias.aligned, adx, separation);
        let risk_reward = event.risk_reward().unwrap_or(0.0);
        let (score, tier) = self
            .scorer
            .score(category, risk_reward, adx, separation, bias.aligned);
        let profile = self.profiles.profile(&self.validator.strategy_key(), zone);

        Ok(ScoredSignal {
            ticker: event.ticker.clone(),
            direction: event.direction,
            category,
            score,
            tier,
            profile,
            novelty: outcome.novelty,
            risk_reward,
            generated_at: Utc::now(),
        })
    }

    /// Evaluate a batch under one bias context and rank the survivors
    /// best-first. Ties break on novelty, then ticker, so the order is
    /// fully deterministic.
    pub async fn evaluate_batch(
        &self,
        events: &[RawEvent],
        bias: &BiasContext,
        zone: MarketZone,
    ) -> RankedIdeas {
        let mut ranked = RankedIdeas::default();
        for event in events {
            match self.evaluate(event, bias, zone).await {
                Ok(idea) => ranked.ideas.push(idea),
                Err(rejection) => ranked.rejections.push((event.ticker.clone(), rejection)),
            }
        }
        sort_best_first(&mut ranked.ideas);
        ranked
    }

    /// Evaluate a feed of events, fetching bias context per event from
    /// the provider, and rank the survivors best-first
    pub async fn rank_feed(&self, events: &[RawEvent]) -> RankedIdeas {
        let mut ranked = RankedIdeas::default();
        for event in events {
            let (bias, zone) = self.fetch_context(event.direction).await;
            match self.evaluate(event, &bias, zone).await {
                Ok(idea) => ranked.ideas.push(idea),
                Err(rejection) => ranked.rejections.push((event.ticker.clone(), rejection)),
            }
        }
        sort_best_first(&mut ranked.ideas);
        ranked
    }

    /// Current bias context and zone, degrading to neutral/CHOP when
    /// the provider is unavailable rather than aborting
    async fn fetch_context(&self, direction: Direction) -> (BiasContext, MarketZone) {
        let bias = match self.bias.current_bias(self.timeframe, direction).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(error = %e, "bias provider unavailable, degrading to neutral");
                BiasContext::neutral()
            }
        };
        let zone = match self.bias.current_zone().await {
            Ok(zone) => zone,
            Err(e) => {
                warn!(error = %e, "zone unavailable, degrading to CHOP");
                MarketZone::Chop
            }
        };
        (bias, zone)
    }

    /// Ingestion loop: evaluates events as they arrive, forwarding
    /// accepted ideas to the output sink. Per-event failures never
    /// abort the loop.
    pub async fn run(&self, mut events: mpsc::Receiver<RawEvent>) -> Result<(), EngineError> {
        *self.is_running.write().await = true;
        info!(strategy = %self.validator.strategy_name(), "signal engine started");

        while *self.is_running.read().await {
            let Some(event) = events.recv().await else {
                break;
            };

            let (bias, zone) = self.fetch_context(event.direction).await;

            match self.evaluate(&event, &bias, zone).await {
                Ok(idea) => {
                    info!(
                        ticker = %idea.ticker,
                        category = %idea.category,
                        score = idea.score,
                        tier = %idea.tier,
                        "idea accepted"
                    );
                    if let Err(e) = self.sink.publish_ideas(std::slice::from_ref(&idea)).await {
                        warn!(error = %e, ticker = %idea.ticker, "failed to publish idea");
                    }
                }
                Err(rejection) => {
                    debug!(ticker = %event.ticker, %rejection, "event rejected");
                }
            }
        }

        *self.is_running.write().await = false;
        info!("signal engine stopped");
        Ok(())
    }

    /// Stop the ingestion loop after the in-flight event
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        info!("stop signal sent to engine");
    }

    /// Run the benchmark tracker once, holding the advisory execution
    /// slot. Returns `Ok(None)` when another run is already in flight;
    /// the non-idempotent append must never race itself.
    pub async fn run_benchmark(&self) -> Result<Option<BenchmarkSeries>, EngineError> {
        let Ok(_slot) = self.benchmark_slot.try_lock() else {
            warn!("benchmark run already in flight, skipping");
            return Ok(None);
        };

        let series = self.tracker.update_benchmarks().await?;
        self.sink.archive_benchmark(&series).await?;
        Ok(Some(series))
    }

    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            is_running: *self.is_running.read().await,
            tracked_tickers: self.filter.read().await.tracked_tickers(),
        }
    }

    /// Copy the novelty histories for durable storage
    pub async fn history_snapshot(&self) -> HistorySnapshot {
        self.filter.read().await.snapshot()
    }

    /// Reload novelty histories from a durable snapshot at startup
    pub async fn restore_history(&self, snapshot: HistorySnapshot) {
        self.filter.write().await.restore(snapshot);
    }
}

fn sort_best_first(ideas: &mut [ScoredSignal]) {
    ideas.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(
                b.novelty
                    .partial_cmp(&a.novelty)
                    .unwrap_or(Ordering::Equal),
            )
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}

// Needed for sharing across tasks (Ctrl-C handler, benchmark schedule)
impl Clone for SignalEngine {
    fn clone(&self) -> Self {
        Self {
            filter: Arc::clone(&self.filter),
            validator: self.validator.clone(),
            scorer: self.scorer.clone(),
            profiles: self.profiles.clone(),
            tracker: Arc::clone(&self.tracker),
            bias: Arc::clone(&self.bias),
            sink: Arc::clone(&self.sink),
            benchmark_slot: Arc::clone(&self.benchmark_slot),
            is_running: Arc::clone(&self.is_running),
            timeframe: self.timeframe,
        }
    }
}
