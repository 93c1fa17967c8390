//! Historical market data ports used by the benchmark tracker.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bias::ProviderError;

/// One close observation. Providers may deliver several ticks per
/// calendar day; the consumer keeps the last one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub day: NaiveDate,
    pub close: f64,
}

/// Ordered daily close prices for a ticker
#[async_trait]
pub trait PriceHistoryPort: Send + Sync {
    /// Close observations in chronological order, possibly with
    /// same-day duplicates
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<DailyClose>, ProviderError>;
}

/// One bias-direction sign per calendar day: +1 bullish composite,
/// -1 bearish, 0 neutral
#[async_trait]
pub trait DailyBiasPort: Send + Sync {
    async fn daily_signs(&self) -> Result<HashMap<NaiveDate, i8>, ProviderError>;
}
