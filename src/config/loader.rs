//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching the
//! structure of config/default.toml.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{MarketZone, RiskRewardProfile, SignalCategory};
use crate::strategy::params::{
    BenchmarkConfig, NoveltyConfig, ScoringConfig, TierThresholds, ValidatorConfig,
};
use crate::strategy::profiles::{
    ProfileEntry, ProfileSelector, DEFAULT_STOP_MULTIPLIER, DEFAULT_TARGET_MULTIPLIER,
};

/// Main configuration structure matching the TOML layout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub filter: FilterSection,
    pub validator: ValidatorSection,
    pub scoring: ScoringSection,
    #[serde(default)]
    pub profiles: ProfilesSection,
    pub benchmark: BenchmarkSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Novelty filter section
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSection {
    /// Minimum days-to-expiry (inclusive)
    pub min_dte: i64,
    /// Maximum days-to-expiry (inclusive)
    pub max_dte: i64,
    /// Minimum USD premium per event
    pub min_premium: f64,
    /// Rolling alert window in minutes
    pub window_minutes: i64,
    /// Alert count where novelty starts decaying
    pub decay_threshold: u32,
    /// Symbols excluded from discovery
    #[serde(default = "default_blacklist")]
    pub discovery_blacklist: Vec<String>,
}

fn default_blacklist() -> Vec<String> {
    NoveltyConfig::default().discovery_blacklist
}

/// Strategy validator section
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorSection {
    /// Named strategy the rules belong to
    pub strategy_name: String,
    /// ADX must be strictly above this value
    pub min_adx: f64,
    /// Minimum line separation in points
    pub min_separation_points: f64,
    /// Earliest exchange-local entry time, "HH:MM"
    pub earliest_entry: String,
    /// IANA timezone of the exchange
    pub exchange_timezone: String,
    /// Reject unparseable timestamps instead of using the wall clock
    #[serde(default)]
    pub strict_timestamps: bool,
}

/// Composite scorer section
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSection {
    pub apis_call_base: f64,
    pub kodiak_call_base: f64,
    pub bullish_trade_base: f64,
    pub bear_call_base: f64,
    /// Multiplier on the risk/reward ratio
    pub rr_weight: f64,
    /// Cap on the risk/reward contribution
    pub rr_cap: f64,
    /// Flat bonus for bias-aligned ideas
    pub alignment_bonus: f64,
    /// Clamp the final score to 100
    pub clamp_total: bool,
    pub elite_threshold: f64,
    pub strong_threshold: f64,
    pub moderate_threshold: f64,
}

/// One configured risk/reward profile row
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub signal_type: String,
    pub zone: MarketZone,
    pub stop_multiplier: f64,
    pub target_multiplier: f64,
}

/// Profile table section. An empty table falls back to the built-in
/// production table; declaration order in the file is preserved.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesSection {
    pub default_stop: f64,
    pub default_target: f64,
    #[serde(default)]
    pub table: Vec<ProfileRow>,
}

impl Default for ProfilesSection {
    fn default() -> Self {
        Self {
            default_stop: DEFAULT_STOP_MULTIPLIER,
            default_target: DEFAULT_TARGET_MULTIPLIER,
            table: Vec::new(),
        }
    }
}

/// Benchmark tracker section
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkSection {
    /// Reference instrument for comparison curves
    pub reference_ticker: String,
    /// Annual risk-free rate, e.g. 0.05
    pub annual_risk_free_rate: f64,
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Also log to a file
    #[serde(default)]
    pub log_to_file: bool,
    /// Log file path
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_log_file() -> String {
    "logs/apiary.log".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: default_log_file(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the config path, honoring the APIARY_CONFIG env override
pub fn config_path(cli_path: &Path) -> PathBuf {
    std::env::var("APIARY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| cli_path.to_path_buf())
}

impl Config {
    /// Validate all configuration parameters by running each stage
    /// config's own checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        NoveltyConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        ValidatorConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        ScoringConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        BenchmarkConfig::from(self)
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.profiles.default_stop <= 0.0 || self.profiles.default_target <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "profile multipliers must be > 0, got default ({}, {})",
                self.profiles.default_stop, self.profiles.default_target
            )));
        }
        for row in &self.profiles.table {
            if row.stop_multiplier <= 0.0 || row.target_multiplier <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "profile multipliers must be > 0, got ({}, {}) for {}/{}",
                    row.stop_multiplier, row.target_multiplier, row.signal_type, row.zone
                )));
            }
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Build the profile selector from the configured table, falling
    /// back to the production table when none is configured
    pub fn profile_selector(&self) -> ProfileSelector {
        if self.profiles.table.is_empty() {
            return ProfileSelector::production();
        }
        let entries = self
            .profiles
            .table
            .iter()
            .map(|row| {
                ProfileEntry::new(
                    &row.signal_type,
                    row.zone,
                    row.stop_multiplier,
                    row.target_multiplier,
                )
            })
            .collect();
        ProfileSelector::new(
            entries,
            RiskRewardProfile::new(self.profiles.default_stop, self.profiles.default_target),
        )
    }
}

impl From<&Config> for NoveltyConfig {
    fn from(config: &Config) -> Self {
        NoveltyConfig {
            min_dte: config.filter.min_dte,
            max_dte: config.filter.max_dte,
            min_premium: config.filter.min_premium,
            window_minutes: config.filter.window_minutes,
            decay_threshold: config.filter.decay_threshold,
            discovery_blacklist: config.filter.discovery_blacklist.clone(),
        }
    }
}

impl From<&Config> for ValidatorConfig {
    fn from(config: &Config) -> Self {
        ValidatorConfig {
            strategy_name: config.validator.strategy_name.clone(),
            min_adx: config.validator.min_adx,
            min_separation_points: config.validator.min_separation_points,
            earliest_entry: config.validator.earliest_entry.clone(),
            exchange_timezone: config.validator.exchange_timezone.clone(),
            strict_timestamps: config.validator.strict_timestamps,
        }
    }
}

impl From<&Config> for ScoringConfig {
    fn from(config: &Config) -> Self {
        let s = &config.scoring;
        ScoringConfig {
            base_scores: std::collections::HashMap::from([
                (SignalCategory::ApisCall, s.apis_call_base),
                (SignalCategory::KodiakCall, s.kodiak_call_base),
                (SignalCategory::BullishTrade, s.bullish_trade_base),
                (SignalCategory::BearCall, s.bear_call_base),
            ]),
            rr_weight: s.rr_weight,
            rr_cap: s.rr_cap,
            alignment_bonus: s.alignment_bonus,
            clamp_total: s.clamp_total,
            tiers: TierThresholds {
                elite: s.elite_threshold,
                strong: s.strong_threshold,
                moderate: s.moderate_threshold,
            },
            ..ScoringConfig::default()
        }
    }
}

impl From<&Config> for BenchmarkConfig {
    fn from(config: &Config) -> Self {
        BenchmarkConfig {
            reference_ticker: config.benchmark.reference_ticker.clone(),
            annual_risk_free_rate: config.benchmark.annual_risk_free_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> String {
        r#"
[filter]
min_dte = 7
max_dte = 180
min_premium = 50000.0
window_minutes = 60
decay_threshold = 5
discovery_blacklist = ["SPY", "QQQ"]

[validator]
strategy_name = "Triple Line"
min_adx = 25.0
min_separation_points = 10.0
earliest_entry = "10:00"
exchange_timezone = "America/New_York"
strict_timestamps = false

[scoring]
apis_call_base = 40.0
kodiak_call_base = 40.0
bullish_trade_base = 20.0
bear_call_base = 20.0
rr_weight = 7.5
rr_cap = 30.0
alignment_bonus = 10.0
clamp_total = true
elite_threshold = 80.0
strong_threshold = 60.0
moderate_threshold = 40.0

[profiles]
default_stop = 1.5
default_target = 3.0

[[profiles.table]]
signal_type = "TRIPLE_LINE"
zone = "MAX_LONG"
stop_multiplier = 1.0
target_multiplier = 3.0

[[profiles.table]]
signal_type = "GOLDEN_TOUCH"
zone = "MAX_LONG"
stop_multiplier = 1.2
target_multiplier = 3.6

[benchmark]
reference_ticker = "SPY"
annual_risk_free_rate = 0.05

[logging]
level = "info"
log_to_file = false
log_file = "logs/apiary.log"
"#
        .to_string()
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.filter.min_dte, 7);
        assert_eq!(config.filter.decay_threshold, 5);
        assert_eq!(config.validator.strategy_name, "Triple Line");
        assert_eq!(config.scoring.apis_call_base, 40.0);
        assert_eq!(config.benchmark.reference_ticker, "SPY");
        assert_eq!(config.profiles.table.len(), 2);
        assert_eq!(config.profiles.table[1].zone, MarketZone::MaxLong);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let content = create_valid_config().replace("window_minutes = 60", "window_minutes = 0");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let content = create_valid_config()
            .replace("America/New_York", "Mars/Olympus_Mons");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_tier_order_violation_rejected() {
        let content =
            create_valid_config().replace("strong_threshold = 60.0", "strong_threshold = 85.0");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_unknown_zone_fails_parse() {
        let content = create_valid_config().replace("\"MAX_LONG\"", "\"UPSIDE_DOWN\"");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }

    #[test]
    fn test_profiles_section_optional() {
        let full = create_valid_config();
        let start = full.find("[profiles]").unwrap();
        let end = full.find("[benchmark]").unwrap();
        let content = format!("{}{}", &full[..start], &full[end..]);
        let file = write_config(&content);
        let config = load_config(file.path()).unwrap();
        // No configured table: production table applies
        assert!(config.profiles.table.is_empty());
        assert!(config.profile_selector().entry_count() > 0);
    }

    #[test]
    fn test_config_to_stage_configs() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();

        let novelty = NoveltyConfig::from(&config);
        assert_eq!(novelty.window_minutes, 60);
        assert_eq!(novelty.discovery_blacklist, vec!["SPY", "QQQ"]);

        let validator = ValidatorConfig::from(&config);
        assert_eq!(validator.exchange_timezone, "America/New_York");

        let scoring = ScoringConfig::from(&config);
        assert_eq!(
            scoring.base_scores[&crate::domain::SignalCategory::BullishTrade],
            20.0
        );
        assert_eq!(scoring.tiers.elite, 80.0);

        let benchmark = BenchmarkConfig::from(&config);
        assert_eq!(benchmark.reference_ticker, "SPY");
    }

    #[test]
    fn test_configured_profile_table_preserves_order() {
        let file = write_config(&create_valid_config());
        let config = load_config(file.path()).unwrap();
        let selector = config.profile_selector();
        let profile = selector.profile("GOLDEN_TOUCH", MarketZone::Waterfall);
        // First declared GOLDEN_TOUCH row is MAX_LONG's multipliers
        assert_eq!(profile.stop_multiplier, 1.2);
        assert_eq!(profile.target_multiplier, 3.6);
    }

    #[test]
    fn test_negative_multiplier_rejected() {
        let content =
            create_valid_config().replace("stop_multiplier = 1.0", "stop_multiplier = -1.0");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let content = create_valid_config().replace("level = \"info\"", "level = \"loud\"");
        let file = write_config(&content);
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }
}
