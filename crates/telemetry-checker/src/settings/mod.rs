pub mod validation;

use crate::processor::util::PercentileMethod;
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, path::Path};
use validation::validate_config;

/// Main settings configuration for telemetry-checker
///
/// Every field has a default so the binary runs without any configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for application logging (e.g., "info", "debug", "warn", "error")
    pub log_level: String,
    /// HTTP server configuration
    pub server: ServerSettings,
    /// Telemetry dataset configuration
    pub dataset: DatasetSettings,
    /// Aggregation behavior configuration
    pub aggregation: AggregationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerSettings::default(),
            dataset: DatasetSettings::default(),
            aggregation: AggregationSettings::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address for the aggregation API
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

/// Telemetry dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Candidate dataset paths, tried in order; the first that exists wins
    pub paths: Vec<String>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                "data/telemetry.json".to_string(),
                "telemetry.json".to_string(),
            ],
        }
    }
}

/// Aggregation behavior configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Percentile estimator ("nearest-rank" or "interpolated")
    pub percentile: PercentileMethod,
}

impl Settings {
    /// Load configuration from a specific config file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        // Construct settings, env vars take priority still
        let settings = ConfigBuilder::builder()
            .add_source(File::with_name(&path.as_ref().to_string_lossy()))
            .add_source(
                Environment::with_prefix("TELEM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        // NOTE: It's ok if this fails (file might not exist)
        let _ = dotenvy::dotenv();

        let settings: Settings = ConfigBuilder::builder()
            .add_source(
                Environment::with_prefix("TELEM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        validate_config(&settings)?;

        Ok(settings)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings {{\n\
             \tLog Level: {}\n\
             \tServer Addr: {}\n\
             \tDataset Paths: {:?}\n\
             \tPercentile Method: {:?}\n\
             }}",
            self.log_level, self.server.addr, self.dataset.paths, self.aggregation.percentile,
        )
    }
}
