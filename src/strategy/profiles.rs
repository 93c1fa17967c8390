//! Risk/Reward Profile Selector
//!
//! Static lookup of stop/target multipliers keyed by signal type and
//! market zone. The table keeps its declaration order: when no zone
//! matches exactly, the first declared entry for the signal type wins,
//! not a "closest zone" match.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{MarketZone, RiskRewardProfile};

/// Fallback multipliers when the signal type has no entry at all
pub const DEFAULT_STOP_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_TARGET_MULTIPLIER: f64 = 3.0;

/// One row of the profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub signal_type: String,
    pub zone: MarketZone,
    pub stop_multiplier: f64,
    pub target_multiplier: f64,
}

impl ProfileEntry {
    pub fn new(
        signal_type: &str,
        zone: MarketZone,
        stop_multiplier: f64,
        target_multiplier: f64,
    ) -> Self {
        Self {
            signal_type: signal_type.to_string(),
            zone,
            stop_multiplier,
            target_multiplier,
        }
    }

    fn profile(&self) -> RiskRewardProfile {
        RiskRewardProfile::new(self.stop_multiplier, self.target_multiplier)
    }
}

/// Ordered profile table with a fixed default
#[derive(Debug, Clone)]
pub struct ProfileSelector {
    entries: Vec<ProfileEntry>,
    default_profile: RiskRewardProfile,
}

impl ProfileSelector {
    pub fn new(entries: Vec<ProfileEntry>, default_profile: RiskRewardProfile) -> Self {
        Self {
            entries,
            default_profile,
        }
    }

    /// The production table. Order matters: the first row per signal
    /// type doubles as that type's zone-agnostic fallback.
    pub fn production() -> Self {
        Self::new(
            vec![
                ProfileEntry::new("TRIPLE_LINE", MarketZone::MaxLong, 1.0, 3.0),
                ProfileEntry::new("TRIPLE_LINE", MarketZone::Recovery, 1.25, 2.75),
                ProfileEntry::new("TRIPLE_LINE", MarketZone::Chop, 1.5, 2.5),
                ProfileEntry::new("TRIPLE_LINE", MarketZone::Distribution, 1.5, 2.25),
                ProfileEntry::new("TRIPLE_LINE", MarketZone::Waterfall, 1.75, 2.25),
                ProfileEntry::new("TRIPLE_LINE", MarketZone::Capitulation, 2.0, 2.0),
                ProfileEntry::new("GOLDEN_TOUCH", MarketZone::MaxLong, 1.2, 3.6),
                ProfileEntry::new("GOLDEN_TOUCH", MarketZone::Recovery, 1.4, 3.2),
                ProfileEntry::new("GOLDEN_TOUCH", MarketZone::Capitulation, 2.2, 2.4),
            ],
            RiskRewardProfile::new(DEFAULT_STOP_MULTIPLIER, DEFAULT_TARGET_MULTIPLIER),
        )
    }

    /// Select a profile. Lookup order: exact (signal_type, zone) match,
    /// then the first declared entry for the signal type, then the
    /// fixed default.
    pub fn profile(&self, signal_type: &str, zone: MarketZone) -> RiskRewardProfile {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.signal_type == signal_type && e.zone == zone)
        {
            return entry.profile();
        }

        if let Some(entry) = self.entries.iter().find(|e| e.signal_type == signal_type) {
            debug!(
                signal_type,
                %zone,
                fallback_zone = %entry.zone,
                "no exact zone entry, using first declared profile"
            );
            return entry.profile();
        }

        debug!(signal_type, %zone, "unknown signal type, using default profile");
        self.default_profile
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for ProfileSelector {
    fn default() -> Self {
        Self::production()
    }
}
