use serde::{Deserialize, Deserializer};

use crate::range::DateRangePreset;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MEMBER_PULSE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Tunables for the aggregation engine.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Per-user activity (messages + interactions) that maps to a score of 100.
    #[serde(default = "default_engagement_normalization")]
    pub engagement_normalization: f64,
    /// Percent change between series halves needed to call a trend.
    #[serde(default = "default_trend_threshold_pct")]
    pub trend_threshold_pct: f64,
    #[serde(default = "default_top_products_limit")]
    pub top_products_limit: usize,
    /// How far back the `all` preset reaches.
    #[serde(default = "default_all_history_years")]
    pub all_history_years: u32,
    /// Unknown presets fall back to `30d` rather than failing the load.
    #[serde(default, deserialize_with = "lenient_preset")]
    pub default_range: DateRangePreset,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = crate::PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(crate::PulseError::Config(format!(
                "unsupported export format: {other}"
            ))),
        }
    }
}

fn lenient_preset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateRangePreset, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(DateRangePreset::parse_or_default(&raw))
}

fn default_engagement_normalization() -> f64 {
    20.0
}
fn default_trend_threshold_pct() -> f64 {
    5.0
}
fn default_top_products_limit() -> usize {
    5
}
fn default_all_history_years() -> u32 {
    10
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            engagement_normalization: default_engagement_normalization(),
            trend_threshold_pct: default_trend_threshold_pct(),
            top_products_limit: default_top_products_limit(),
            all_history_years: default_all_history_years(),
            default_range: DateRangePreset::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analytics: AnalyticsConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(env);

        let config = builder.build()?;
        config.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("MEMBER_PULSE")
        .separator("__")
        .try_parsing(true)
}
