//! Benchmark Tracker
//!
//! Independent batch analytic that maintains comparison equity curves
//! for retrospective evaluation: buy-and-hold, bias-following and a
//! risk-free compounding baseline. Runs on its own schedule, never in
//! the event hot path.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::BenchmarkSeries;
use crate::ports::bias::ProviderError;
use crate::ports::market_data::{DailyBiasPort, DailyClose, PriceHistoryPort};
use crate::strategy::params::BenchmarkConfig;

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Insufficient data: {0} daily closes (need at least 2)")]
    InsufficientData(usize),

    #[error("Invalid data: first close {0} is not positive")]
    InvalidData(f64),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] ProviderError),
}

pub struct BenchmarkTracker {
    config: BenchmarkConfig,
    prices: Arc<dyn PriceHistoryPort>,
    bias_days: Arc<dyn DailyBiasPort>,
}

impl BenchmarkTracker {
    pub fn new(
        config: BenchmarkConfig,
        prices: Arc<dyn PriceHistoryPort>,
        bias_days: Arc<dyn DailyBiasPort>,
    ) -> Self {
        Self {
            config,
            prices,
            bias_days,
        }
    }

    pub fn reference_ticker(&self) -> &str {
        &self.config.reference_ticker
    }

    /// Compute one benchmark row from the full available history.
    ///
    /// A failed run returns an error without producing a partial row;
    /// persisting the row is the caller's job so that nothing is
    /// written on failure.
    pub async fn update_benchmarks(&self) -> Result<BenchmarkSeries, BenchmarkError> {
        let ticks = self
            .prices
            .daily_closes(&self.config.reference_ticker)
            .await?;
        let closes = dedupe_by_day(ticks);

        if closes.len() < 2 {
            return Err(BenchmarkError::InsufficientData(closes.len()));
        }
        let first = closes[0];
        let last = closes[closes.len() - 1];
        if first.close <= 0.0 {
            return Err(BenchmarkError::InvalidData(first.close));
        }

        let buy_hold_return = last.close / first.close - 1.0;

        let signs = self.bias_days.daily_signs().await?;
        let bias_follow_return = compound_bias_follow(&closes, &signs);

        let elapsed_days = (last.day - first.day).num_days().max(1);
        let annual = 1.0 + self.config.annual_risk_free_rate;
        let risk_free_return = annual.powf(elapsed_days as f64 / 365.0) - 1.0;

        info!(
            ticker = %self.config.reference_ticker,
            days = elapsed_days,
            buy_hold = buy_hold_return,
            bias_follow = bias_follow_return,
            risk_free = risk_free_return,
            "benchmark curves updated"
        );

        Ok(BenchmarkSeries {
            reference_ticker: self.config.reference_ticker.clone(),
            buy_hold_return,
            bias_follow_return,
            risk_free_return,
            elapsed_days,
            computed_at: Utc::now(),
        })
    }
}

/// Keep the last tick per calendar day, ascending by day
fn dedupe_by_day(ticks: Vec<DailyClose>) -> Vec<DailyClose> {
    let mut by_day: BTreeMap<_, f64> = BTreeMap::new();
    for tick in ticks {
        by_day.insert(tick.day, tick.close);
    }
    by_day
        .into_iter()
        .map(|(day, close)| DailyClose { day, close })
        .collect()
}

/// Compound a unit of equity by following each day's bias sign.
/// A day pair is skipped when the previous close is not positive;
/// a day with no recorded sign trades flat.
fn compound_bias_follow(
    closes: &[DailyClose],
    signs: &std::collections::HashMap<chrono::NaiveDate, i8>,
) -> f64 {
    let mut equity = 1.0;
    for pair in closes.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.close <= 0.0 {
            debug!(day = %prev.day, close = prev.close, "skipping non-positive close");
            continue;
        }
        let daily_return = cur.close / prev.close - 1.0;
        let sign = signs.get(&cur.day).copied().unwrap_or(0) as f64;
        equity *= 1.0 + sign * daily_return;
    }
    equity - 1.0
}
