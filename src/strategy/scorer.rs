//! Composite Scorer
//!
//! Multi-factor quality score over a classified signal: a per-category
//! base, a capped risk/reward term, two clamped technical terms and a
//! flat alignment bonus, rounded to one decimal place and banded into
//! tiers.

use tracing::debug;

use crate::domain::{ScoreTier, SignalCategory};
use crate::strategy::params::ScoringConfig;

#[derive(Debug, Clone)]
pub struct CompositeScorer {
    config: ScoringConfig,
}

impl CompositeScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score a classified signal. Pure with respect to its inputs.
    ///
    /// The total is clamped to 100.0 unless `clamp_total` is disabled,
    /// which restores the historical unbounded behavior.
    pub fn score(
        &self,
        category: SignalCategory,
        risk_reward: f64,
        adx: f64,
        line_separation: f64,
        bias_aligned: bool,
    ) -> (f64, ScoreTier) {
        let c = &self.config;

        let base = c.base_scores.get(&category).copied().unwrap_or(0.0);
        let rr_term = (risk_reward * c.rr_weight).min(c.rr_cap);
        let adx_term = ((adx - c.adx_floor) / c.adx_scale).clamp(0.0, c.technical_cap);
        let separation_term =
            ((line_separation - c.separation_floor) / c.separation_scale).clamp(0.0, c.technical_cap);
        let alignment_term = if bias_aligned { c.alignment_bonus } else { 0.0 };

        let mut total = base + rr_term + adx_term + separation_term + alignment_term;
        if c.clamp_total {
            total = total.min(100.0);
        }
        let score = round_one_decimal(total);
        let tier = self.tier(score);

        debug!(
            %category,
            base,
            rr_term,
            adx_term,
            separation_term,
            alignment_term,
            score,
            "composite score"
        );
        (score, tier)
    }

    /// Band a score into its tier
    pub fn tier(&self, score: f64) -> ScoreTier {
        let t = &self.config.tiers;
        if score >= t.elite {
            ScoreTier::Elite
        } else if score >= t.strong {
            ScoreTier::Strong
        } else if score >= t.moderate {
            ScoreTier::Moderate
        } else {
            ScoreTier::Weak
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scorer() -> CompositeScorer {
        CompositeScorer::new(ScoringConfig::default())
    }

    #[test]
    fn test_reference_scenario() {
        // APIS_CALL, rr=3, adx=35, separation=20, aligned:
        // 40 + 22.5 + (4 + 5) + 10 = 81.5
        let (score, tier) = scorer().score(SignalCategory::ApisCall, 3.0, 35.0, 20.0, true);
        assert_relative_eq!(score, 81.5);
        assert_eq!(tier, ScoreTier::Elite);
    }

    #[test]
    fn test_base_scores_per_category() {
        // Zero everything else out: rr=0, adx/separation at floors, unaligned
        let scorer = scorer();
        let score = |category| scorer.score(category, 0.0, 25.0, 10.0, false).0;
        assert_relative_eq!(score(SignalCategory::ApisCall), 40.0);
        assert_relative_eq!(score(SignalCategory::KodiakCall), 40.0);
        assert_relative_eq!(score(SignalCategory::BullishTrade), 20.0);
        assert_relative_eq!(score(SignalCategory::BearCall), 20.0);
    }

    #[test]
    fn test_rr_contribution_is_capped() {
        let scorer = scorer();
        let (capped, _) = scorer.score(SignalCategory::BearCall, 100.0, 25.0, 10.0, false);
        // 20 base + capped 30
        assert_relative_eq!(capped, 50.0);
    }

    #[test]
    fn test_technical_terms_are_clamped() {
        let scorer = scorer();
        // Far above the scales: both terms cap at 10
        let (score, _) = scorer.score(SignalCategory::BearCall, 0.0, 500.0, 500.0, false);
        assert_relative_eq!(score, 40.0);
        // Below the floors: both terms clamp at 0, never negative
        let (score, _) = scorer.score(SignalCategory::BearCall, 0.0, 5.0, 2.0, false);
        assert_relative_eq!(score, 20.0);
    }

    #[test]
    fn test_alignment_bonus() {
        let scorer = scorer();
        let unaligned = scorer.score(SignalCategory::BullishTrade, 2.0, 30.0, 14.0, false).0;
        let aligned = scorer.score(SignalCategory::BullishTrade, 2.0, 30.0, 14.0, true).0;
        assert_relative_eq!(aligned - unaligned, 10.0);
    }

    #[test]
    fn test_clamped_at_one_hundred() {
        // Max everything: 40 + 30 + 10 + 10 + 10 = 100 even unclamped,
        // so push the base table up to force an overflow
        let mut config = ScoringConfig::default();
        config.base_scores.insert(SignalCategory::ApisCall, 55.0);
        let scorer = CompositeScorer::new(config);
        let (score, tier) = scorer.score(SignalCategory::ApisCall, 10.0, 100.0, 100.0, true);
        assert_relative_eq!(score, 100.0);
        assert_eq!(tier, ScoreTier::Elite);
    }

    #[test]
    fn test_unclamped_legacy_mode() {
        let mut config = ScoringConfig::default();
        config.clamp_total = false;
        config.base_scores.insert(SignalCategory::ApisCall, 55.0);
        let scorer = CompositeScorer::new(config);
        let (score, _) = scorer.score(SignalCategory::ApisCall, 10.0, 100.0, 100.0, true);
        assert_relative_eq!(score, 105.0);
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let scorer = scorer();
        // rr term: 1.234 * 7.5 = 9.255 -> total 29.255 rounds to 29.3
        let (score, _) = scorer.score(SignalCategory::BearCall, 1.234, 25.0, 10.0, false);
        assert_relative_eq!(score, 29.3);
    }

    #[test]
    fn test_tier_bands() {
        let scorer = scorer();
        assert_eq!(scorer.tier(85.0), ScoreTier::Elite);
        assert_eq!(scorer.tier(80.0), ScoreTier::Elite);
        assert_eq!(scorer.tier(79.9), ScoreTier::Strong);
        assert_eq!(scorer.tier(60.0), ScoreTier::Strong);
        assert_eq!(scorer.tier(59.9), ScoreTier::Moderate);
        assert_eq!(scorer.tier(40.0), ScoreTier::Moderate);
        assert_eq!(scorer.tier(39.9), ScoreTier::Weak);
    }

    #[test]
    fn test_determinism() {
        let scorer = scorer();
        let a = scorer.score(SignalCategory::ApisCall, 3.0, 35.0, 20.0, true);
        let b = scorer.score(SignalCategory::ApisCall, 3.0, 35.0, 20.0, true);
        assert_eq!(a, b);
    }
}
