//! Output sink port for ranked ideas and benchmark rows.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{BenchmarkSeries, ScoredSignal};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sink rejected the write: {0}")]
    Rejected(String),
}

/// Downstream consumer of pipeline output.
///
/// Benchmark rows are append-only; repeated runs create additional
/// dated rows, and any upsert-by-day policy belongs to the
/// implementation behind this trait, not to the core.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Forward a batch of ranked ideas for display/forwarding
    async fn publish_ideas(&self, ideas: &[ScoredSignal]) -> Result<(), SinkError>;

    /// Append one benchmark row for archival
    async fn archive_benchmark(&self, series: &BenchmarkSeries) -> Result<(), SinkError>;
}

/// In-memory sink for testing and development
#[derive(Debug, Default)]
pub struct MemorySink {
    ideas: RwLock<Vec<ScoredSignal>>,
    benchmarks: RwLock<Vec<BenchmarkSeries>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ideas(&self) -> Vec<ScoredSignal> {
        self.ideas.read().await.clone()
    }

    pub async fn benchmarks(&self) -> Vec<BenchmarkSeries> {
        self.benchmarks.read().await.clone()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn publish_ideas(&self, ideas: &[ScoredSignal]) -> Result<(), SinkError> {
        self.ideas.write().await.extend_from_slice(ideas);
        Ok(())
    }

    async fn archive_benchmark(&self, series: &BenchmarkSeries) -> Result<(), SinkError> {
        self.benchmarks.write().await.push(series.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, RiskRewardProfile, ScoreTier, SignalCategory};
    use chrono::Utc;

    fn idea(ticker: &str) -> ScoredSignal {
        ScoredSignal {
            ticker: ticker.to_string(),
            direction: Direction::Long,
            category: SignalCategory::ApisCall,
            score: 81.5,
            tier: ScoreTier::Elite,
            profile: RiskRewardProfile::new(1.0, 3.0),
            novelty: 1.0,
            risk_reward: 3.0,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_sink_records_ideas() {
        let sink = MemorySink::new();
        sink.publish_ideas(&[idea("AMD"), idea("MSFT")]).await.unwrap();
        let stored = sink.ideas().await;
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].ticker, "AMD");
    }

    #[tokio::test]
    async fn test_memory_sink_appends_benchmarks() {
        let sink = MemorySink::new();
        let series = BenchmarkSeries {
            reference_ticker: "SPY".to_string(),
            buy_hold_return: -0.01,
            bias_follow_return: 0.05,
            risk_free_return: 0.0003,
            elapsed_days: 2,
            computed_at: Utc::now(),
        };
        sink.archive_benchmark(&series).await.unwrap();
        sink.archive_benchmark(&series).await.unwrap();
        // Append-only: repeated runs add rows
        assert_eq!(sink.benchmarks().await.len(), 2);
    }
}
