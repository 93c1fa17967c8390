//! Signal Validator
//!
//! Stateless per-strategy rule checks. Rules run in a fixed order and
//! short-circuit on the first failure; every failure carries a
//! human-readable reason for downstream display.

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::{Direction, RawEvent, ValidationOutcome};
use crate::strategy::params::{ParamsError, ValidatorConfig};

/// Rule checker for one named strategy (default "Triple Line").
///
/// Check order:
/// 1. ADX present and above the floor
/// 2. Line separation present and wide enough
/// 3. Exchange-local event time at or after the entry window opens
/// 4. Direction LONG or SHORT (structural, see [`Direction`])
/// 5. Entry and stop prices present
/// 6. Stop on the correct side of entry for the direction
#[derive(Debug, Clone)]
pub struct SignalValidator {
    config: ValidatorConfig,
    timezone: Tz,
    earliest_entry: NaiveTime,
}

impl SignalValidator {
    pub fn new(config: ValidatorConfig) -> Result<Self, ParamsError> {
        config.validate()?;
        let timezone = config
            .exchange_timezone
            .parse::<Tz>()
            .map_err(|_| ParamsError::InvalidTimezone(config.exchange_timezone.clone()))?;
        let earliest_entry = NaiveTime::parse_from_str(&config.earliest_entry, "%H:%M")
            .map_err(|_| ParamsError::InvalidEntryTime(config.earliest_entry.clone()))?;
        Ok(Self {
            config,
            timezone,
            earliest_entry,
        })
    }

    /// Named strategy these rules belong to
    pub fn strategy_name(&self) -> &str {
        &self.config.strategy_name
    }

    /// Strategy name normalized for table lookups, e.g. "TRIPLE_LINE"
    pub fn strategy_key(&self) -> String {
        self.config
            .strategy_name
            .trim()
            .to_ascii_uppercase()
            .replace(' ', "_")
    }

    pub fn validate(&self, event: &RawEvent) -> ValidationOutcome {
        let adx = match event.adx {
            None => return ValidationOutcome::fail("ADX not provided".to_string()),
            Some(adx) if adx <= self.config.min_adx => {
                return ValidationOutcome::fail(format!("ADX too low: {}", adx));
            }
            Some(adx) => adx,
        };

        let separation = match event.line_separation {
            None => {
                return ValidationOutcome::fail("Line separation not provided".to_string());
            }
            Some(sep) if sep < self.config.min_separation_points => {
                return ValidationOutcome::fail(format!("Line separation too low: {}pts", sep));
            }
            Some(sep) => sep,
        };

        if let Some(outcome) = self.check_entry_window(event.timestamp) {
            return outcome;
        }

        // Direction is a closed enum; anything that parsed is LONG or
        // SHORT, so the legacy direction rule holds by construction.

        let entry = match event.entry_price {
            None => return ValidationOutcome::fail("Entry price not provided".to_string()),
            Some(entry) => entry,
        };
        let stop = match event.stop_price {
            None => return ValidationOutcome::fail("Stop price not provided".to_string()),
            Some(stop) => stop,
        };

        match event.direction {
            Direction::Long if stop >= entry => {
                return ValidationOutcome::fail(format!(
                    "Invalid stop: {} must be below entry {} for LONG",
                    stop, entry
                ));
            }
            Direction::Short if stop <= entry => {
                return ValidationOutcome::fail(format!(
                    "Invalid stop: {} must be above entry {} for SHORT",
                    stop, entry
                ));
            }
            _ => {}
        }

        ValidationOutcome::pass(format!(
            "Valid {} signal: ADX={}, separation={}pts",
            event.direction, adx, separation
        ))
    }

    /// Time-of-day gate in the exchange's local timezone.
    ///
    /// A missing timestamp falls back to the current wall-clock time in
    /// lenient mode, preserving the legacy behavior; strict mode rejects
    /// the event outright.
    fn check_entry_window(&self, timestamp: Option<DateTime<Utc>>) -> Option<ValidationOutcome> {
        let event_time = match timestamp {
            Some(ts) => ts,
            None if self.config.strict_timestamps => {
                return Some(ValidationOutcome::fail(
                    "Unparseable event timestamp".to_string(),
                ));
            }
            None => {
                warn!(
                    strategy = %self.config.strategy_name,
                    "event timestamp unparseable, falling back to current time"
                );
                Utc::now()
            }
        };

        let local = event_time.with_timezone(&self.timezone);
        if local.time() < self.earliest_entry {
            return Some(ValidationOutcome::fail(format!(
                "Too early to enter: {} is before {} {}",
                local.format("%H:%M"),
                self.config.earliest_entry,
                self.timezone
            )));
        }
        None
    }
}
