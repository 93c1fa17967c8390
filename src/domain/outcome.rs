//! Pipeline stage outcomes and the final scored idea.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::event::Direction;

/// Result of the novelty filter for one event.
///
/// Rejections carry a reason from a fixed enumeration of strings;
/// passes carry the novelty score and the in-window alert count.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub passed: bool,
    pub reason: Option<String>,
    /// Decayed weight in (0, 1]; 1.0 for a first-in-window alert
    pub novelty: f64,
    /// Alerts for this ticker inside the rolling window, this one included
    pub alerts_last_hour: usize,
}

impl FilterOutcome {
    pub fn rejected(reason: String) -> Self {
        Self {
            passed: false,
            reason: Some(reason),
            novelty: 0.0,
            alerts_last_hour: 0,
        }
    }

    pub fn accepted(novelty: f64, alerts_last_hour: usize) -> Self {
        Self {
            passed: true,
            reason: None,
            novelty,
            alerts_last_hour,
        }
    }
}

/// Result of strategy-rule validation for one event
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub reason: String,
}

impl ValidationOutcome {
    pub fn pass(reason: String) -> Self {
        Self {
            passed: true,
            reason,
        }
    }

    pub fn fail(reason: String) -> Self {
        Self {
            passed: false,
            reason,
        }
    }
}

/// Signal category assigned by the bias classifier.
///
/// ApisCall/BullishTrade are long-only, KodiakCall/BearCall short-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalCategory {
    ApisCall,
    KodiakCall,
    BullishTrade,
    BearCall,
}

impl SignalCategory {
    pub fn direction(&self) -> Direction {
        match self {
            SignalCategory::ApisCall | SignalCategory::BullishTrade => Direction::Long,
            SignalCategory::KodiakCall | SignalCategory::BearCall => Direction::Short,
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalCategory::ApisCall => "APIS_CALL",
            SignalCategory::KodiakCall => "KODIAK_CALL",
            SignalCategory::BullishTrade => "BULLISH_TRADE",
            SignalCategory::BearCall => "BEAR_CALL",
        };
        write!(f, "{}", name)
    }
}

/// Coarse banding over the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreTier {
    Elite,
    Strong,
    Moderate,
    Weak,
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreTier::Elite => "ELITE",
            ScoreTier::Strong => "STRONG",
            ScoreTier::Moderate => "MODERATE",
            ScoreTier::Weak => "WEAK",
        };
        write!(f, "{}", name)
    }
}

/// Stop/target multipliers selected for an idea
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardProfile {
    pub stop_multiplier: f64,
    pub target_multiplier: f64,
}

impl RiskRewardProfile {
    pub fn new(stop_multiplier: f64, target_multiplier: f64) -> Self {
        Self {
            stop_multiplier,
            target_multiplier,
        }
    }
}

/// A fully evaluated trade idea, ready for ranking and display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSignal {
    pub ticker: String,
    pub direction: Direction,
    pub category: SignalCategory,
    /// Composite quality score, one decimal place
    pub score: f64,
    pub tier: ScoreTier,
    pub profile: RiskRewardProfile,
    pub novelty: f64,
    pub risk_reward: f64,
    pub generated_at: DateTime<Utc>,
}

/// Pipeline stage that rejected an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Filter,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Filter => write!(f, "filter"),
            Stage::Validation => write!(f, "validation"),
        }
    }
}

/// Non-fatal, per-event rejection with a human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub stage: Stage,
    pub reason: String,
}

impl Rejection {
    pub fn filter(reason: impl Into<String>) -> Self {
        Self {
            stage: Stage::Filter,
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self {
            stage: Stage::Validation,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected at {}: {}", self.stage, self.reason)
    }
}

/// One appended row of comparison equity-curve returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSeries {
    pub reference_ticker: String,
    /// Cumulative return of holding from first to last close
    pub buy_hold_return: f64,
    /// Cumulative return of following the daily bias sign
    pub bias_follow_return: f64,
    /// Cumulative return of the risk-free compounding baseline
    pub risk_free_return: f64,
    /// Calendar days covered by the series
    pub elapsed_days: i64,
    pub computed_at: DateTime<Utc>,
}
