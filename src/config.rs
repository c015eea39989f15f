//! Configuration management for the entertainment engine
//!
//! Strongly-typed configuration read from environment variables (and an
//! optional `.env` file), with validation and sensible defaults. Scoring
//! weights may additionally come from a TOML file.
//!
//! # Example
//! ```no_run
//! use entertainment::Config;
//! let config = Config::from_env().expect("failed to load config");
//! println!("Catalog: {}", config.catalog.path.display());
//! ```

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};
use crate::recommendation::{DuplicatePolicy, ScoringWeights};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Catalog persistence
    pub catalog: CatalogConfig,
    /// Profile persistence
    pub profiles: ProfileConfig,
    /// Scoring and ranking
    pub recommendation: RecommendationConfig,
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// JSON catalog file
    pub path: PathBuf,
    /// Behavior when an id is added twice to one kind
    pub duplicate_policy: DuplicatePolicy,
}

/// Profile configuration
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    /// JSON file holding every user profile
    pub path: PathBuf,
}

/// Recommendation engine configuration
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Scoring weights
    pub weights: ScoringWeights,
    /// Recommendations returned per kind when the caller gives no count
    pub default_count: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            default_count: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();

        let config = Self {
            catalog: CatalogConfig::from_env()?,
            profiles: ProfileConfig::from_env(),
            recommendation: RecommendationConfig::from_env()?,
        };

        config.validate()?;
        config.log_summary();

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.recommendation.validate()
    }

    /// Log configuration summary
    fn log_summary(&self) {
        let w = &self.recommendation.weights;
        info!("Configuration loaded:");
        info!("  Catalog:");
        info!("    Path: {}", self.catalog.path.display());
        info!("    Duplicate ids: {}", self.catalog.duplicate_policy);
        info!("  Profiles:");
        info!("    Path: {}", self.profiles.path.display());
        info!("  Recommendation:");
        info!(
            "    Weights: genre={} year={} near_year={} rating={} attribute={}",
            w.genre, w.year, w.near_year, w.rating, w.attribute
        );
        info!("    Year window: {}", w.year_window);
        info!("    Default count: {}", self.recommendation.default_count);
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self> {
        let policy = get_env_or("CATALOG_DUPLICATE_POLICY", "reject");
        let duplicate_policy = policy
            .parse::<DuplicatePolicy>()
            .map_err(|e: String| Error::InvalidConfig {
                key: "CATALOG_DUPLICATE_POLICY",
                message: e.into(),
            })?;

        Ok(Self {
            path: PathBuf::from(get_env_or("CATALOG_PATH", "entertainment_db.json")),
            duplicate_policy,
        })
    }
}

impl ProfileConfig {
    fn from_env() -> Self {
        Self {
            path: PathBuf::from(get_env_or("PROFILES_PATH", "users.json")),
        }
    }
}

impl RecommendationConfig {
    fn from_env() -> Result<Self> {
        let mut weights = match std::env::var("REC_WEIGHTS_FILE") {
            Ok(path) if !path.trim().is_empty() => load_weights_file(Path::new(path.trim()))?,
            _ => ScoringWeights::default(),
        };

        weights.genre = get_env_parsed_or("REC_GENRE_WEIGHT", weights.genre)?;
        weights.year = get_env_parsed_or("REC_YEAR_WEIGHT", weights.year)?;
        weights.near_year = get_env_parsed_or("REC_NEAR_YEAR_WEIGHT", weights.near_year)?;
        weights.rating = get_env_parsed_or("REC_RATING_WEIGHT", weights.rating)?;
        weights.attribute = get_env_parsed_or("REC_ATTRIBUTE_WEIGHT", weights.attribute)?;
        weights.year_window = get_env_parsed_or("REC_YEAR_WINDOW", weights.year_window)?;
        weights.trending_age_penalty =
            get_env_parsed_or("REC_TRENDING_AGE_PENALTY", weights.trending_age_penalty)?;

        Ok(Self {
            weights,
            default_count: get_env_parsed_or("REC_DEFAULT_COUNT", 3)?,
        })
    }

    /// Every weight finite and non-negative, at least one result per kind
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.weights.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    key: weight_key(name),
                    message: format!("weight {} must be a non-negative number", value).into(),
                });
            }
        }

        if self.default_count == 0 {
            return Err(Error::InvalidConfig {
                key: "REC_DEFAULT_COUNT",
                message: "must be at least 1".into(),
            });
        }

        Ok(())
    }
}

/// Read scoring weights from a TOML file; missing keys keep their defaults
pub fn load_weights_file(path: &Path) -> Result<ScoringWeights> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_weights(&contents)
}

/// Parse scoring weights from TOML text
pub fn parse_weights(contents: &str) -> Result<ScoringWeights> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: "invalid scoring weights file".into(),
        source: Some(Box::new(e)),
    })
}

fn weight_key(name: &str) -> &'static str {
    match name {
        "genre" => "REC_GENRE_WEIGHT",
        "year" => "REC_YEAR_WEIGHT",
        "near_year" => "REC_NEAR_YEAR_WEIGHT",
        "rating" => "REC_RATING_WEIGHT",
        "attribute" => "REC_ATTRIBUTE_WEIGHT",
        "trending_age_penalty" => "REC_TRENDING_AGE_PENALTY",
        _ => "REC_WEIGHTS_FILE",
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get environment variable with default
fn get_env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset
fn get_env_parsed_or<T>(key: &'static str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<T>().map_err(|e: T::Err| Error::InvalidConfig {
            key,
            message: format!("Invalid value '{}': {}", value, e).into(),
        }),
        Err(_) => Ok(default),
    }
}
