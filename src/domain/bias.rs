//! Market bias context and structure zones.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::event::Direction;

/// Ordinal macro-directional bias on a fixed 5-point bearish-to-bullish scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BiasLevel {
    UrsaMajor,
    UrsaMinor,
    Neutral,
    ToroMinor,
    ToroMajor,
}

impl BiasLevel {
    /// Major readings at either end of the scale
    pub fn is_major(&self) -> bool {
        matches!(self, BiasLevel::UrsaMajor | BiasLevel::ToroMajor)
    }

    /// Direction sign of the bias: +1 bullish, -1 bearish, 0 neutral
    pub fn direction_sign(&self) -> i8 {
        match self {
            BiasLevel::UrsaMajor | BiasLevel::UrsaMinor => -1,
            BiasLevel::Neutral => 0,
            BiasLevel::ToroMinor | BiasLevel::ToroMajor => 1,
        }
    }

    /// Whether a trade direction agrees with this bias.
    /// Neutral aligns with nothing.
    pub fn aligns_with(&self, direction: Direction) -> bool {
        match direction {
            Direction::Long => self.direction_sign() > 0,
            Direction::Short => self.direction_sign() < 0,
        }
    }
}

impl fmt::Display for BiasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BiasLevel::UrsaMajor => "URSA_MAJOR",
            BiasLevel::UrsaMinor => "URSA_MINOR",
            BiasLevel::Neutral => "NEUTRAL",
            BiasLevel::ToroMinor => "TORO_MINOR",
            BiasLevel::ToroMajor => "TORO_MAJOR",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for BiasLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "URSA_MAJOR" => Ok(BiasLevel::UrsaMajor),
            "URSA_MINOR" => Ok(BiasLevel::UrsaMinor),
            "NEUTRAL" => Ok(BiasLevel::Neutral),
            "TORO_MINOR" => Ok(BiasLevel::ToroMinor),
            "TORO_MAJOR" => Ok(BiasLevel::ToroMajor),
            other => Err(format!("Unknown bias level: {}", other)),
        }
    }
}

/// Timeframe a bias reading applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

/// Bias reading paired with whether it agrees with a specific trade
/// direction. The alignment flag is derived by the provider, not by
/// the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasContext {
    pub level: BiasLevel,
    pub aligned: bool,
}

impl BiasContext {
    pub fn new(level: BiasLevel, aligned: bool) -> Self {
        Self { level, aligned }
    }

    /// Degraded context used when the bias provider is unavailable
    pub fn neutral() -> Self {
        Self {
            level: BiasLevel::Neutral,
            aligned: false,
        }
    }
}

/// Discrete market-structure classification used to select risk parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketZone {
    MaxLong,
    Recovery,
    Chop,
    Distribution,
    Waterfall,
    Capitulation,
}

impl fmt::Display for MarketZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarketZone::MaxLong => "MAX_LONG",
            MarketZone::Recovery => "RECOVERY",
            MarketZone::Chop => "CHOP",
            MarketZone::Distribution => "DISTRIBUTION",
            MarketZone::Waterfall => "WATERFALL",
            MarketZone::Capitulation => "CAPITULATION",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for MarketZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAX_LONG" => Ok(MarketZone::MaxLong),
            "RECOVERY" => Ok(MarketZone::Recovery),
            "CHOP" => Ok(MarketZone::Chop),
            "DISTRIBUTION" => Ok(MarketZone::Distribution),
            "WATERFALL" => Ok(MarketZone::Waterfall),
            "CAPITULATION" => Ok(MarketZone::Capitulation),
            other => Err(format!("Unknown market zone: {}", other)),
        }
    }
}
