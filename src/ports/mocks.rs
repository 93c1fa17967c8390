//! Hand-rolled port mocks that record calls and serve controlled
//! responses. Used by the engine and benchmark tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{BiasContext, BiasLevel, Direction, MarketZone, Timeframe};
use crate::ports::bias::{BiasProvider, ProviderError};
use crate::ports::market_data::{DailyBiasPort, DailyClose, PriceHistoryPort};

/// Bias provider that derives alignment from a fixed level and records
/// the timeframes it was asked about
#[derive(Debug)]
pub struct FixedBiasProvider {
    level: BiasLevel,
    zone: MarketZone,
    fail: bool,
    calls: Arc<Mutex<Vec<Timeframe>>>,
}

impl FixedBiasProvider {
    pub fn new(level: BiasLevel, zone: MarketZone) -> Self {
        Self {
            level,
            zone,
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builder method making every call fail, for degradation tests
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<Timeframe> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BiasProvider for FixedBiasProvider {
    async fn current_bias(
        &self,
        timeframe: Timeframe,
        direction: Direction,
    ) -> Result<BiasContext, ProviderError> {
        self.calls.lock().unwrap().push(timeframe);
        if self.fail {
            return Err(ProviderError::Unavailable("bias feed down".to_string()));
        }
        Ok(BiasContext::new(self.level, self.level.aligns_with(direction)))
    }

    async fn current_zone(&self) -> Result<MarketZone, ProviderError> {
        if self.fail {
            return Err(ProviderError::Unavailable("bias feed down".to_string()));
        }
        Ok(self.zone)
    }
}

/// Price history serving a fixed set of ticks
#[derive(Debug, Default)]
pub struct StaticPriceHistory {
    ticks: Vec<DailyClose>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticPriceHistory {
    pub fn new(ticks: Vec<DailyClose>) -> Self {
        Self {
            ticks,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceHistoryPort for StaticPriceHistory {
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<DailyClose>, ProviderError> {
        self.calls.lock().unwrap().push(ticker.to_string());
        Ok(self.ticks.clone())
    }
}

/// Price history that always fails, for upstream-degradation tests
#[derive(Debug, Default)]
pub struct FailingPriceHistory;

#[async_trait]
impl PriceHistoryPort for FailingPriceHistory {
    async fn daily_closes(&self, _ticker: &str) -> Result<Vec<DailyClose>, ProviderError> {
        Err(ProviderError::Unavailable("price feed down".to_string()))
    }
}

/// Daily bias signs served from a fixed map
#[derive(Debug, Default)]
pub struct StaticDailySigns {
    signs: HashMap<NaiveDate, i8>,
}

impl StaticDailySigns {
    pub fn new(signs: HashMap<NaiveDate, i8>) -> Self {
        Self { signs }
    }
}

#[async_trait]
impl DailyBiasPort for StaticDailySigns {
    async fn daily_signs(&self) -> Result<HashMap<NaiveDate, i8>, ProviderError> {
        Ok(self.signs.clone())
    }
}
