//! File-backed provider adapters for replay sessions
//!
//! The CLI has no live bias or market-data feed; these adapters serve
//! the provider ports from CLI flags and JSONL files instead.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{BiasContext, BiasLevel, Direction, MarketZone, Timeframe};
use crate::ports::bias::{BiasProvider, ProviderError};
use crate::ports::market_data::{DailyBiasPort, DailyClose, PriceHistoryPort};

/// Bias provider pinned to the level and zone given on the command
/// line. Alignment is derived from the level's direction sign.
#[derive(Debug, Clone)]
pub struct SessionBiasProvider {
    level: BiasLevel,
    zone: MarketZone,
}

impl SessionBiasProvider {
    pub fn new(level: BiasLevel, zone: MarketZone) -> Self {
        Self { level, zone }
    }
}

#[async_trait]
impl BiasProvider for SessionBiasProvider {
    async fn current_bias(
        &self,
        _timeframe: Timeframe,
        direction: Direction,
    ) -> Result<BiasContext, ProviderError> {
        Ok(BiasContext::new(self.level, self.level.aligns_with(direction)))
    }

    async fn current_zone(&self) -> Result<MarketZone, ProviderError> {
        Ok(self.zone)
    }
}

/// Placeholder history provider for commands that never touch the
/// benchmark tracker
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

#[async_trait]
impl PriceHistoryPort for NoHistory {
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<DailyClose>, ProviderError> {
        Err(ProviderError::NoData(ticker.to_string()))
    }
}

#[async_trait]
impl DailyBiasPort for NoHistory {
    async fn daily_signs(&self) -> Result<HashMap<NaiveDate, i8>, ProviderError> {
        Err(ProviderError::NoData("daily bias signs".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct CloseRow {
    day: NaiveDate,
    close: f64,
}

/// Daily close history read from a JSONL file of
/// `{"day": "2026-03-02", "close": 100.0}` rows
#[derive(Debug, Clone)]
pub struct JsonlPriceHistory {
    path: PathBuf,
}

impl JsonlPriceHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl PriceHistoryPort for JsonlPriceHistory {
    async fn daily_closes(&self, _ticker: &str) -> Result<Vec<DailyClose>, ProviderError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let mut closes = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let row: CloseRow = serde_json::from_str(line)
                .map_err(|e| ProviderError::Malformed(e.to_string()))?;
            closes.push(DailyClose {
                day: row.day,
                close: row.close,
            });
        }
        Ok(closes)
    }
}

#[derive(Debug, Deserialize)]
struct SignRow {
    day: NaiveDate,
    sign: i8,
}

/// Daily bias signs read from a JSONL file of
/// `{"day": "2026-03-02", "sign": 1}` rows
#[derive(Debug, Clone)]
pub struct JsonlDailyBias {
    path: PathBuf,
}

impl JsonlDailyBias {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DailyBiasPort for JsonlDailyBias {
    async fn daily_signs(&self) -> Result<HashMap<NaiveDate, i8>, ProviderError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let mut signs = HashMap::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            let row: SignRow = serde_json::from_str(line)
                .map_err(|e| ProviderError::Malformed(e.to_string()))?;
            signs.insert(row.day, row.sign.signum());
        }
        Ok(signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_session_bias_alignment() {
        let provider = SessionBiasProvider::new(BiasLevel::UrsaMajor, MarketZone::Waterfall);
        let ctx = provider
            .current_bias(Timeframe::Daily, Direction::Short)
            .await
            .unwrap();
        assert_eq!(ctx.level, BiasLevel::UrsaMajor);
        assert!(ctx.aligned);
        assert_eq!(provider.current_zone().await.unwrap(), MarketZone::Waterfall);
    }

    #[tokio::test]
    async fn test_jsonl_price_history() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"day":"2026-03-02","close":100.0}}"#).unwrap();
        writeln!(file, r#"{{"day":"2026-03-03","close":102.0}}"#).unwrap();

        let history = JsonlPriceHistory::new(file.path().to_path_buf());
        let closes = history.daily_closes("SPY").await.unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[1].close, 102.0);
    }

    #[tokio::test]
    async fn test_jsonl_daily_bias_normalizes_signs() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"day":"2026-03-03","sign":5}}"#).unwrap();
        writeln!(file, r#"{{"day":"2026-03-04","sign":-2}}"#).unwrap();

        let bias = JsonlDailyBias::new(file.path().to_path_buf());
        let signs = bias.daily_signs().await.unwrap();
        assert_eq!(signs[&NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()], 1);
        assert_eq!(signs[&NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()], -1);
    }

    #[tokio::test]
    async fn test_malformed_row_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let history = JsonlPriceHistory::new(file.path().to_path_buf());
        assert!(matches!(
            history.daily_closes("SPY").await,
            Err(ProviderError::Malformed(_))
        ));
    }
}
