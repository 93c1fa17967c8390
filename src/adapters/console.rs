//! Console output sink
//!
//! Prints ranked ideas to stdout and appends benchmark rows to a JSONL
//! archive file when one is configured.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

use crate::domain::{BenchmarkSeries, ScoredSignal};
use crate::ports::sink::{OutputSink, SinkError};

#[derive(Debug, Default)]
pub struct ConsoleSink {
    benchmark_archive: Option<PathBuf>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append benchmark rows to this JSONL file instead of stdout
    pub fn with_benchmark_archive(mut self, path: PathBuf) -> Self {
        self.benchmark_archive = Some(path);
        self
    }
}

#[async_trait]
impl OutputSink for ConsoleSink {
    async fn publish_ideas(&self, ideas: &[ScoredSignal]) -> Result<(), SinkError> {
        for idea in ideas {
            println!(
                "{:<6} {:<5} {:<13} score={:<6} tier={:<8} rr={:.2} novelty={:.2} stop x{} target x{}",
                idea.ticker,
                idea.direction.to_string(),
                idea.category.to_string(),
                idea.score,
                idea.tier.to_string(),
                idea.risk_reward,
                idea.novelty,
                idea.profile.stop_multiplier,
                idea.profile.target_multiplier,
            );
        }
        Ok(())
    }

    async fn archive_benchmark(&self, series: &BenchmarkSeries) -> Result<(), SinkError> {
        let line = serde_json::to_string(series)?;
        match &self.benchmark_archive {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(line.as_bytes()).await?;
                file.write_all(b"\n").await?;
            }
            None => println!("{}", line),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn series() -> BenchmarkSeries {
        BenchmarkSeries {
            reference_ticker: "SPY".to_string(),
            buy_hold_return: -0.01,
            bias_follow_return: 0.05,
            risk_free_return: 0.0003,
            elapsed_days: 2,
            computed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_archive_appends_jsonl_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmarks.jsonl");
        let sink = ConsoleSink::new().with_benchmark_archive(path.clone());

        sink.archive_benchmark(&series()).await.unwrap();
        sink.archive_benchmark(&series()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let row: BenchmarkSeries = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(row.reference_ticker, "SPY");
    }
}
