//! Pipeline Stage Parameters
//!
//! Configuration structs for the signal evaluation pipeline stages.
//! Defaults reproduce the production rule set for the "Triple Line"
//! strategy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::SignalCategory;

/// Novelty filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoveltyConfig {
    /// Minimum acceptable days-to-expiry (inclusive)
    pub min_dte: i64,
    /// Maximum acceptable days-to-expiry (inclusive)
    pub max_dte: i64,
    /// Minimum USD premium for an event to be considered
    pub min_premium: f64,
    /// Rolling alert-history window in minutes
    pub window_minutes: i64,
    /// Alert count at which novelty starts decaying below 1.0
    pub decay_threshold: u32,
    /// Highly-liquid symbols excluded from discovery
    pub discovery_blacklist: Vec<String>,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            min_dte: 7,
            max_dte: 180,
            min_premium: 50_000.0,
            window_minutes: 60,
            decay_threshold: 5,
            discovery_blacklist: ["SPY", "QQQ", "IWM", "AAPL", "TSLA", "NVDA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl NoveltyConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_dte < 0 || self.max_dte < self.min_dte {
            return Err(ParamsError::InvalidDteRange(self.min_dte, self.max_dte));
        }
        if self.min_premium < 0.0 {
            return Err(ParamsError::InvalidPremium(self.min_premium));
        }
        if self.window_minutes <= 0 {
            return Err(ParamsError::InvalidWindow(self.window_minutes));
        }
        if self.decay_threshold == 0 {
            return Err(ParamsError::InvalidDecayThreshold(self.decay_threshold));
        }
        Ok(())
    }
}

/// Strategy-rule validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Named strategy the rules belong to
    pub strategy_name: String,
    /// ADX must be strictly above this value
    pub min_adx: f64,
    /// Line separation must be at least this many points
    pub min_separation_points: f64,
    /// Earliest acceptable exchange-local entry time, "HH:MM"
    pub earliest_entry: String,
    /// IANA timezone of the exchange
    pub exchange_timezone: String,
    /// Reject events with unparseable timestamps instead of falling
    /// back to the current wall-clock time
    pub strict_timestamps: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strategy_name: "Triple Line".to_string(),
            min_adx: 25.0,
            min_separation_points: 10.0,
            earliest_entry: "10:00".to_string(),
            exchange_timezone: "America/New_York".to_string(),
            strict_timestamps: false,
        }
    }
}

impl ValidatorConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.strategy_name.trim().is_empty() {
            return Err(ParamsError::EmptyStrategyName);
        }
        if self.min_adx < 0.0 {
            return Err(ParamsError::InvalidAdxThreshold(self.min_adx));
        }
        if self.min_separation_points < 0.0 {
            return Err(ParamsError::InvalidSeparationThreshold(
                self.min_separation_points,
            ));
        }
        if chrono::NaiveTime::parse_from_str(&self.earliest_entry, "%H:%M").is_err() {
            return Err(ParamsError::InvalidEntryTime(self.earliest_entry.clone()));
        }
        if self.exchange_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ParamsError::InvalidTimezone(self.exchange_timezone.clone()));
        }
        Ok(())
    }
}

/// Tier banding thresholds over the composite score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierThresholds {
    pub elite: f64,
    pub strong: f64,
    pub moderate: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            elite: 80.0,
            strong: 60.0,
            moderate: 40.0,
        }
    }
}

/// Composite scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Per-category base scores; unknown categories score 0
    pub base_scores: HashMap<SignalCategory, f64>,
    /// Multiplier applied to the risk/reward ratio
    pub rr_weight: f64,
    /// Cap on the risk/reward contribution
    pub rr_cap: f64,
    /// ADX level where the technical contribution starts
    pub adx_floor: f64,
    /// Points of ADX per technical point
    pub adx_scale: f64,
    /// Separation level where the technical contribution starts
    pub separation_floor: f64,
    /// Points of separation per technical point
    pub separation_scale: f64,
    /// Cap on each technical term
    pub technical_cap: f64,
    /// Flat bonus when the idea agrees with the bias
    pub alignment_bonus: f64,
    /// Clamp the final score to 100.0
    pub clamp_total: bool,
    pub tiers: TierThresholds,
}

/// The production base-score table
pub fn default_base_scores() -> HashMap<SignalCategory, f64> {
    HashMap::from([
        (SignalCategory::ApisCall, 40.0),
        (SignalCategory::KodiakCall, 40.0),
        (SignalCategory::BullishTrade, 20.0),
        (SignalCategory::BearCall, 20.0),
    ])
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_scores: default_base_scores(),
            rr_weight: 7.5,
            rr_cap: 30.0,
            adx_floor: 25.0,
            adx_scale: 2.5,
            separation_floor: 10.0,
            separation_scale: 2.0,
            technical_cap: 10.0,
            alignment_bonus: 10.0,
            clamp_total: true,
            tiers: TierThresholds::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.rr_weight < 0.0 || self.rr_cap < 0.0 {
            return Err(ParamsError::InvalidScoringTerm("risk/reward"));
        }
        if self.adx_scale <= 0.0 || self.separation_scale <= 0.0 || self.technical_cap < 0.0 {
            return Err(ParamsError::InvalidScoringTerm("technical"));
        }
        if self.alignment_bonus < 0.0 {
            return Err(ParamsError::InvalidScoringTerm("alignment"));
        }
        let t = &self.tiers;
        if !(t.elite > t.strong && t.strong > t.moderate) {
            return Err(ParamsError::InvalidTierThresholds(
                t.elite, t.strong, t.moderate,
            ));
        }
        Ok(())
    }
}

/// Benchmark tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Reference instrument for the comparison curves
    pub reference_ticker: String,
    /// Annual risk-free compounding rate, e.g. 0.05 for 5%
    pub annual_risk_free_rate: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            reference_ticker: "SPY".to_string(),
            annual_risk_free_rate: 0.05,
        }
    }
}

impl BenchmarkConfig {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.reference_ticker.trim().is_empty() {
            return Err(ParamsError::EmptyReferenceTicker);
        }
        if self.annual_risk_free_rate <= -1.0 {
            return Err(ParamsError::InvalidRiskFreeRate(self.annual_risk_free_rate));
        }
        Ok(())
    }
}

/// Stage parameter validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid DTE range: {0}..={1}")]
    InvalidDteRange(i64, i64),
    #[error("Invalid minimum premium: {0}")]
    InvalidPremium(f64),
    #[error("Invalid alert window: {0} minutes (must be > 0)")]
    InvalidWindow(i64),
    #[error("Invalid decay threshold: {0} (must be > 0)")]
    InvalidDecayThreshold(u32),
    #[error("Strategy name cannot be empty")]
    EmptyStrategyName,
    #[error("Invalid ADX threshold: {0}")]
    InvalidAdxThreshold(f64),
    #[error("Invalid separation threshold: {0}")]
    InvalidSeparationThreshold(f64),
    #[error("Invalid entry time: {0} (expected HH:MM)")]
    InvalidEntryTime(String),
    #[error("Unknown exchange timezone: {0}")]
    InvalidTimezone(String),
    #[error("Invalid {0} scoring term")]
    InvalidScoringTerm(&'static str),
    #[error("Tier thresholds must be strictly descending: {0} > {1} > {2}")]
    InvalidTierThresholds(f64, f64, f64),
    #[error("Benchmark reference ticker cannot be empty")]
    EmptyReferenceTicker,
    #[error("Invalid risk-free rate: {0}")]
    InvalidRiskFreeRate(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(NoveltyConfig::default().validate().is_ok());
        assert!(ValidatorConfig::default().validate().is_ok());
        assert!(ScoringConfig::default().validate().is_ok());
        assert!(BenchmarkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_dte_range() {
        let mut config = NoveltyConfig::default();
        config.max_dte = 3;
        assert!(matches!(
            config.validate(),
            Err(ParamsError::InvalidDteRange(7, 3))
        ));
    }

    #[test]
    fn test_invalid_window() {
        let mut config = NoveltyConfig::default();
        config.window_minutes = 0;
        assert!(matches!(
            config.validate(),
            Err(ParamsError::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_invalid_timezone() {
        let mut config = ValidatorConfig::default();
        config.exchange_timezone = "Mars/Olympus_Mons".to_string();
        assert!(matches!(
            config.validate(),
            Err(ParamsError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_invalid_entry_time() {
        let mut config = ValidatorConfig::default();
        config.earliest_entry = "25:99".to_string();
        assert!(matches!(
            config.validate(),
            Err(ParamsError::InvalidEntryTime(_))
        ));
    }

    #[test]
    fn test_tier_thresholds_must_descend() {
        let mut config = ScoringConfig::default();
        config.tiers.strong = 85.0;
        assert!(matches!(
            config.validate(),
            Err(ParamsError::InvalidTierThresholds(_, _, _))
        ));
    }

    #[test]
    fn test_default_base_scores() {
        let scores = default_base_scores();
        assert_eq!(scores[&SignalCategory::ApisCall], 40.0);
        assert_eq!(scores[&SignalCategory::KodiakCall], 40.0);
        assert_eq!(scores[&SignalCategory::BullishTrade], 20.0);
        assert_eq!(scores[&SignalCategory::BearCall], 20.0);
    }
}
