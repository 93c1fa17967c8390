//! Raw flow events as they arrive from the upstream feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction of a flow event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            other => Err(format!("Invalid direction: {}", other)),
        }
    }
}

/// A single raw market/options-flow event.
///
/// Events are ephemeral: created per incoming alert, consumed by the
/// pipeline, discarded after producing a scored idea or a rejection.
/// Optional fields reflect what the upstream feed actually delivers;
/// the validator decides which ones are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Underlying symbol, e.g. "AMD"
    pub ticker: String,
    pub direction: Direction,
    pub entry_price: Option<f64>,
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    /// Average Directional Index at alert time
    pub adx: Option<f64>,
    /// Indicator line separation in points
    pub line_separation: Option<f64>,
    /// Days to expiry for derivative contracts
    pub days_to_expiry: Option<i64>,
    /// USD notional premium of the observed flow
    pub premium: Option<f64>,
    /// Event timestamp; `None` when the feed delivered an unparseable value
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawEvent {
    /// Ratio of target distance to stop distance from the entry price.
    ///
    /// Returns `None` when any price is missing or the stop sits on the
    /// entry (the validator rejects that case before scoring).
    pub fn risk_reward(&self) -> Option<f64> {
        let entry = self.entry_price?;
        let stop = self.stop_price?;
        let target = self.target_price?;
        let risk = (entry - stop).abs();
        if risk <= f64::EPSILON {
            return None;
        }
        Some((target - entry).abs() / risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn event_with_prices(entry: f64, stop: f64, target: f64) -> RawEvent {
        RawEvent {
            ticker: "AMD".to_string(),
            direction: Direction::Long,
            entry_price: Some(entry),
            stop_price: Some(stop),
            target_price: Some(target),
            adx: Some(30.0),
            line_separation: Some(12.0),
            days_to_expiry: Some(30),
            premium: Some(75_000.0),
            timestamp: None,
        }
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("LONG".parse::<Direction>().unwrap(), Direction::Long);
        assert_eq!("short".parse::<Direction>().unwrap(), Direction::Short);
        assert!("SIDEWAYS".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Long.to_string(), "LONG");
        assert_eq!(Direction::Short.to_string(), "SHORT");
    }

    #[test]
    fn test_risk_reward_long() {
        let event = event_with_prices(100.0, 95.0, 115.0);
        assert_relative_eq!(event.risk_reward().unwrap(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_risk_reward_short() {
        let event = event_with_prices(100.0, 104.0, 88.0);
        assert_relative_eq!(event.risk_reward().unwrap(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_risk_reward_missing_target() {
        let mut event = event_with_prices(100.0, 95.0, 115.0);
        event.target_price = None;
        assert!(event.risk_reward().is_none());
    }

    #[test]
    fn test_risk_reward_zero_risk() {
        let event = event_with_prices(100.0, 100.0, 115.0);
        assert!(event.risk_reward().is_none());
    }
}
