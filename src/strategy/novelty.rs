//! Novelty Filter
//!
//! Stateful per-symbol gate in front of the pipeline. Rejects events
//! with out-of-range expiries or undersized premium, then scores how
//! novel the alert is against a rolling per-ticker history.
//!
//! Novelty decays inversely with recent alert frequency: a ticker
//! repeatedly flashing inside the window is progressively
//! deprioritized, while a first occurrence always scores 1.0.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::domain::{FilterOutcome, RawEvent};
use crate::strategy::params::NoveltyConfig;

/// Serializable copy of the alert histories, for durable reload at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub histories: HashMap<String, Vec<DateTime<Utc>>>,
}

/// Sliding-window novelty gate.
///
/// The filter exclusively owns every per-ticker history buffer; all
/// mutation happens inside [`passes`](NoveltyFilter::passes) so the
/// read-prune-append sequence stays atomic behind a single lock.
#[derive(Debug, Clone)]
pub struct NoveltyFilter {
    config: NoveltyConfig,
    history: HashMap<String, VecDeque<DateTime<Utc>>>,
}

impl NoveltyFilter {
    pub fn new(config: NoveltyConfig) -> Self {
        Self {
            config,
            history: HashMap::new(),
        }
    }

    /// Run the gate for one event. Checks apply in fixed order and the
    /// first failure wins; the history is only touched when both
    /// constraint checks pass.
    pub fn passes(&mut self, event: &RawEvent) -> FilterOutcome {
        if let Some(dte) = event.days_to_expiry {
            if dte < self.config.min_dte {
                return FilterOutcome::rejected(format!("DTE too low: {}", dte));
            }
            if dte > self.config.max_dte {
                return FilterOutcome::rejected(format!("DTE too high: {}", dte));
            }
        }

        if let Some(premium) = event.premium {
            if premium < self.config.min_premium {
                return FilterOutcome::rejected(format!(
                    "Premium too low: {} < {}",
                    format_usd(premium),
                    format_usd(self.config.min_premium)
                ));
            }
        }

        let now = event.timestamp.unwrap_or_else(Utc::now);
        let window_start = now - Duration::minutes(self.config.window_minutes);

        let entries = self.history.entry(event.ticker.clone()).or_default();
        while entries.front().is_some_and(|t| *t <= window_start) {
            entries.pop_front();
        }
        entries.push_back(now);

        let count = entries.len();
        let novelty = decayed_novelty(self.config.decay_threshold, count);
        debug!(
            ticker = %event.ticker,
            alerts = count,
            novelty,
            "novelty gate passed"
        );
        FilterOutcome::accepted(novelty, count)
    }

    /// Read-only novelty for a ticker as of `now`. Does not prune or
    /// append; a ticker with no in-window alerts reads as fully novel.
    pub fn novelty_score(&self, ticker: &str, now: DateTime<Utc>) -> f64 {
        decayed_novelty(self.config.decay_threshold, self.alert_count(ticker, now).max(1))
    }

    /// In-window alert count for a ticker as of `now`, read-only
    pub fn alert_count(&self, ticker: &str, now: DateTime<Utc>) -> usize {
        let window_start = now - Duration::minutes(self.config.window_minutes);
        self.history
            .get(ticker)
            .map(|entries| entries.iter().filter(|t| **t > window_start).count())
            .unwrap_or(0)
    }

    /// Whether a ticker may be surfaced by discovery. Highly-liquid
    /// names on the blacklist are already tracked elsewhere.
    pub fn is_discovery_eligible(&self, ticker: &str) -> bool {
        !self
            .config
            .discovery_blacklist
            .iter()
            .any(|t| t.eq_ignore_ascii_case(ticker))
    }

    /// Number of tickers with any recorded history
    pub fn tracked_tickers(&self) -> usize {
        self.history.len()
    }

    /// Copy the histories for durable storage
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            histories: self
                .history
                .iter()
                .map(|(ticker, entries)| (ticker.clone(), entries.iter().copied().collect()))
                .collect(),
        }
    }

    /// Replace the histories from a durable snapshot
    pub fn restore(&mut self, snapshot: HistorySnapshot) {
        self.history = snapshot
            .histories
            .into_iter()
            .map(|(ticker, entries)| (ticker, entries.into_iter().collect()))
            .collect();
    }
}

fn decayed_novelty(decay_threshold: u32, count: usize) -> f64 {
    (decay_threshold as f64 / count as f64).min(1.0)
}

/// "$50,000" style rendering for premium amounts
fn format_usd(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
