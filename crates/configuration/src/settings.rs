use crate::error::ConfigError;
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
}

/// Largest offset, either side of UTC, a real timezone uses.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

impl Config {
    /// Rejects settings that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.analytics.utc_offset_minutes;
        if offset.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "analytics.utc_offset_minutes must be within ±{MAX_UTC_OFFSET_MINUTES}, got {offset}"
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Knobs that change how the analytics engine buckets and scores trades.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Offset from UTC, in minutes, of the trader's local clock. Entry dates,
    /// weekdays, hours and period boundaries are all computed in this offset.
    pub utc_offset_minutes: i32,
    /// Which days the day-of-week breakdown reports on.
    pub weekday_buckets: WeekdayBuckets,
    /// What risk/reward to report when a trade has no planned stop or target.
    pub risk_reward_fallback: RiskRewardFallback,
    /// Which expectancy formula the performance summary uses.
    pub expectancy_formula: ExpectancyFormula,
}

impl AnalyticsSettings {
    /// The configured offset as a chrono timezone. Falls back to UTC for
    /// offsets chrono cannot represent; `Config::validate` rejects those.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            weekday_buckets: WeekdayBuckets::default(),
            risk_reward_fallback: RiskRewardFallback::default(),
            expectancy_formula: ExpectancyFormula::default(),
        }
    }
}

/// Bucket set for the day-of-week breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum WeekdayBuckets {
    /// Monday through Friday. Weekend trades are left out of the breakdown.
    #[default]
    Weekdays,
    /// Monday through Sunday, for markets that trade every day.
    FullWeek,
}

/// Risk/reward reported for trades without both a stop-loss and a take-profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum RiskRewardFallback {
    /// Treat the realised move as the reward and assume the risk was half of it.
    #[default]
    AssumedTwoToOne,
    /// Report no ratio at all; such trades are skipped when averaging.
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum ExpectancyFormula {
    /// `win_rate * avg_win + (1 - win_rate / 100) * avg_loss`, with `win_rate`
    /// on a 0-100 scale in the first term. Matches historical journal numbers.
    #[default]
    Legacy,
    /// `p * avg_win + (1 - p) * avg_loss` with `p = win_rate / 100`.
    ProbabilityWeighted,
}

/// Contains parameters for the tracing subscriber installed by the binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. "info" or "journal=debug,analytics=trace".
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, JSON logs are also written to a file in this directory.
    pub directory: Option<PathBuf>,
    /// Emit console logs as JSON instead of the human-readable format.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            directory: None,
            json: false,
        }
    }
}
