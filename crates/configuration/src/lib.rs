use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsSettings, Config, ExpectancyFormula, LoggingSettings, RiskRewardFallback,
    WeekdayBuckets,
};

/// Prefix for environment overrides, e.g. `JOURNAL__ANALYTICS__UTC_OFFSET_MINUTES=180`.
const ENV_PREFIX: &str = "JOURNAL";

/// Loads the application configuration from an optional `journal.toml` file.
///
/// This function is the primary entry point for this crate. A missing file is not
/// an error: every section has defaults. Environment variables are layered on top.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `journal.toml`
        .add_source(config::File::with_name("journal").required(false));

    finish(builder, environment())
}

/// Loads the configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder().add_source(config::File::from(path).required(true));

    finish(builder, environment())
}

/// The `JOURNAL__SECTION__KEY` override layer over the process environment.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Adds the environment layer, deserializes into our strongly-typed `Config`
/// struct and validates it.
fn finish(
    builder: ConfigBuilder<DefaultState>,
    environment: config::Environment,
) -> Result<Config, ConfigError> {
    let built = builder.add_source(environment).build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = built.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat, Map};

    fn parse_with_env(toml: &str, vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        finish(
            config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
            environment().source(Some(vars)),
        )
    }

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        parse_with_env(toml, &[])
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.analytics, AnalyticsSettings::default());
        assert_eq!(config.analytics.weekday_buckets, WeekdayBuckets::Weekdays);
        assert_eq!(
            config.analytics.risk_reward_fallback,
            RiskRewardFallback::AssumedTwoToOne
        );
        assert_eq!(config.analytics.expectancy_formula, ExpectancyFormula::Legacy);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn parses_every_analytics_setting() {
        let config = parse(
            r#"
            [analytics]
            utc_offset_minutes = 180
            weekday_buckets = "full_week"
            risk_reward_fallback = "undefined"
            expectancy_formula = "probability_weighted"

            [logging]
            level = "analytics=debug"
            directory = "logs"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.utc_offset_minutes, 180);
        assert_eq!(config.analytics.utc_offset().local_minus_utc(), 180 * 60);
        assert_eq!(config.analytics.weekday_buckets, WeekdayBuckets::FullWeek);
        assert_eq!(config.analytics.risk_reward_fallback, RiskRewardFallback::Undefined);
        assert_eq!(
            config.analytics.expectancy_formula,
            ExpectancyFormula::ProbabilityWeighted
        );
        assert_eq!(config.logging.level, "analytics=debug");
        assert_eq!(config.logging.directory.as_deref(), Some(Path::new("logs")));
        assert!(config.logging.json);
    }

    #[test]
    fn rejects_impossible_utc_offset() {
        let err = parse("[analytics]\nutc_offset_minutes = 1440\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn environment_overrides_the_file() {
        let config = parse_with_env(
            "[analytics]\nutc_offset_minutes = 60\n",
            &[
                ("JOURNAL__ANALYTICS__UTC_OFFSET_MINUTES", "180"),
                ("JOURNAL__LOGGING__LEVEL", "debug"),
                ("UNRELATED__ANALYTICS__UTC_OFFSET_MINUTES", "-60"),
            ],
        )
        .unwrap();

        assert_eq!(config.analytics.utc_offset_minutes, 180);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn environment_values_are_validated() {
        let err = parse_with_env("", &[("JOURNAL__ANALYTICS__UTC_OFFSET_MINUTES", "-1500")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_unknown_enum_value() {
        let err = parse("[analytics]\nweekday_buckets = \"weekends\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
