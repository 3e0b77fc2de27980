use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}: {reason}")]
    InvalidEnvVar {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// How the scoring factors combine into the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Weighted sum of popularity and freshness, scaled by forgetting.
    Additive,
    /// Straight product of popularity, freshness and forgetting.
    Multiplicative,
}

impl Composition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Composition::Additive => "additive",
            Composition::Multiplicative => "multiplicative",
        }
    }
}

impl Default for Composition {
    fn default() -> Self {
        Composition::Additive
    }
}

impl FromStr for Composition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "additive" => Ok(Composition::Additive),
            "multiplicative" => Ok(Composition::Multiplicative),
            other => Err(format!("unknown composition mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Likes share of the popularity blend, in [0, 1]; comments get the rest.
    pub alpha: f64,
    /// Relative weight of popularity against freshness.
    pub weight_popularity: f64,
    /// Relative weight of freshness against popularity.
    pub weight_freshness: f64,
    /// Age at which freshness has dropped to half its maximum, in days.
    pub fresh_days: f64,
    /// Steepness of the freshness logistic.
    pub decay_rate: f64,
    /// Days a recommended post stays fully suppressed.
    pub delay_days: f64,
    /// Steepness of the recovery after the suppression window.
    pub recovery_rate: f64,
    pub composition: Composition,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            weight_popularity: 5.0,
            weight_freshness: 5.0,
            fresh_days: 7.0,
            decay_rate: 0.8,
            delay_days: 7.0,
            recovery_rate: 0.8,
            composition: Composition::default(),
        }
    }
}

impl ScoringConfig {
    /// Popularity's share of the additive composition. NaN when both weights
    /// are zero; `validate` rejects that configuration.
    pub fn rate_popularity(&self) -> f64 {
        self.weight_popularity / (self.weight_popularity + self.weight_freshness)
    }

    /// Freshness's share of the additive composition.
    pub fn rate_freshness(&self) -> f64 {
        self.weight_freshness / (self.weight_popularity + self.weight_freshness)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("alpha", self.alpha, 0.0, 1.0)?;
        ensure_finite("weight_popularity", self.weight_popularity)?;
        ensure_finite("weight_freshness", self.weight_freshness)?;
        if self.weight_popularity < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "weight_popularity",
                value: self.weight_popularity,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.weight_freshness < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "weight_freshness",
                value: self.weight_freshness,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.weight_popularity + self.weight_freshness <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "weight_popularity + weight_freshness",
            });
        }
        ensure_finite("fresh_days", self.fresh_days)?;
        ensure_finite("decay_rate", self.decay_rate)?;
        ensure_finite("delay_days", self.delay_days)?;
        ensure_finite("recovery_rate", self.recovery_rate)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Entries per assembled page.
    pub page_size: usize,
    /// Share of each page's sampling mass reserved for new posts, in [0, 1].
    pub new_ratio: f64,
    /// Posts younger than this many hours qualify for the new sub-pool.
    pub fresh_age_cutoff_hours: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            new_ratio: 0.3,
            fresh_age_cutoff_hours: 24.0,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::NotPositive { field: "page_size" });
        }
        ensure_range("new_ratio", self.new_ratio, 0.0, 1.0)?;
        ensure_finite("fresh_age_cutoff_hours", self.fresh_age_cutoff_hours)?;
        if self.fresh_age_cutoff_hours < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "fresh_age_cutoff_hours",
                value: self.fresh_age_cutoff_hours,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(())
    }
}

impl Config {
    /// Read the configuration from `FEEDMIX_*` environment variables (and a
    /// `.env` file when present), falling back to defaults, then validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let scoring_defaults = ScoringConfig::default();
        let feed_defaults = FeedConfig::default();

        let config = Config {
            scoring: ScoringConfig {
                alpha: parse_var("FEEDMIX_ALPHA", scoring_defaults.alpha)?,
                weight_popularity: parse_var(
                    "FEEDMIX_WEIGHT_POPULARITY",
                    scoring_defaults.weight_popularity,
                )?,
                weight_freshness: parse_var(
                    "FEEDMIX_WEIGHT_FRESHNESS",
                    scoring_defaults.weight_freshness,
                )?,
                fresh_days: parse_var("FEEDMIX_FRESH_DAYS", scoring_defaults.fresh_days)?,
                decay_rate: parse_var("FEEDMIX_DECAY_RATE", scoring_defaults.decay_rate)?,
                delay_days: parse_var("FEEDMIX_DELAY_DAYS", scoring_defaults.delay_days)?,
                recovery_rate: parse_var("FEEDMIX_RECOVERY_RATE", scoring_defaults.recovery_rate)?,
                composition: parse_var("FEEDMIX_COMPOSITION", scoring_defaults.composition)?,
            },
            feed: FeedConfig {
                page_size: parse_var("FEEDMIX_PAGE_SIZE", feed_defaults.page_size)?,
                new_ratio: parse_var("FEEDMIX_NEW_RATIO", feed_defaults.new_ratio)?,
                fresh_age_cutoff_hours: parse_var(
                    "FEEDMIX_FRESH_AGE_CUTOFF_HOURS",
                    feed_defaults.fresh_age_cutoff_hours,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.feed.validate()
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|err| ConfigError::InvalidEnvVar {
            key,
            value: raw,
            reason: err.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons and lands here as well.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
