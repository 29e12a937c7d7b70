//! Application configuration module
//!
//! Configuration is read from an optional YAML/JSON/TOML file and then from
//! environment variables with the `ROOM_AHP` prefix. Nested values use double
//! underscores, and environment values override file values.
//!
//! # Example
//!
//! ```no_run
//! use room_ahp::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod aggregation;
mod error;
mod logging;
mod weighting;

pub use aggregation::AggregationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use weighting::WeightingConfig;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ahp::{
    AhpEngine, CriteriaHierarchy, Measurement, ScoreMapper, ScoringBands,
};
use crate::domain::foundation::AhpError;

/// Environment variable naming a configuration file.
pub const CONFIG_PATH_ENV: &str = "ROOM_AHP_CONFIG";

const ENV_PREFIX: &str = "ROOM_AHP";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Optimal and acceptable bands per sensor measurement
    #[serde(default)]
    pub scoring: ScoringBands,

    /// Aggregation method and parameters
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Priority weight derivation
    #[serde(default)]
    pub weighting: WeightingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A file named by `ROOM_AHP_CONFIG` is read first when that variable is
    /// set.
    ///
    /// # Environment Variable Format
    ///
    /// - `ROOM_AHP__AGGREGATION__METHOD=weighted_product` -> `aggregation.method`
    /// - `ROOM_AHP__SCORING__CO2__ACCEPTABLE_MAX=1200` -> `scoring.co2.acceptable_max`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or a value cannot be
    /// parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` before the environment.
    ///
    /// An explicit path takes precedence over `ROOM_AHP_CONFIG`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut builder = seed_band_defaults(config::Config::builder())?;
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "Reading configuration file");
            builder = builder.add_source(config::File::from(file.as_path()).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scoring
            .validate()
            .map_err(|e| ValidationError::InvalidBand(e.to_string()))?;
        self.aggregation.validate()?;
        self.weighting.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Score mapper over the configured bands.
    pub fn score_mapper(&self) -> Result<ScoreMapper, AhpError> {
        ScoreMapper::new(self.scoring.clone())
    }

    /// Criteria hierarchy seeded with the default judgments, weighted with
    /// the configured method and threshold.
    pub fn hierarchy(&self) -> Result<CriteriaHierarchy, AhpError> {
        CriteriaHierarchy::with_solver(self.weighting.solver(), self.weighting.method)
    }

    /// A fresh engine built from this configuration.
    pub fn engine(&self) -> Result<AhpEngine, AhpError> {
        Ok(AhpEngine::with_components(
            self.hierarchy()?,
            self.score_mapper()?,
            self.aggregation.aggregator(),
        ))
    }
}

/// Seeds every band bound so a single bound can be overridden from the
/// environment without restating the rest of its band.
fn seed_band_defaults(
    mut builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let bands = ScoringBands::default();
    for measurement in Measurement::ALL {
        let band = bands.band(measurement);
        let prefix = format!("scoring.{}", measurement.key());
        builder = builder
            .set_default(format!("{prefix}.optimal_min"), band.optimal_min)?
            .set_default(format!("{prefix}.optimal_max"), band.optimal_max)?
            .set_default(format!("{prefix}.acceptable_min"), band.acceptable_min)?
            .set_default(format!("{prefix}.acceptable_max"), band.acceptable_max)?
            .set_default(format!("{prefix}.unit"), band.unit.clone())?
            .set_default(format!("{prefix}.description"), band.description.clone())?;
    }
    Ok(builder)
}
