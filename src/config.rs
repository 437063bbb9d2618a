//! Configuration management for the reservation admin

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    #[validate(length(min = 1))]
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the local key-value storage
    pub path: PathBuf,
    /// Key under which the filter set is stored
    #[validate(length(min = 1, message = "Filter storage key must not be empty"))]
    pub filter_key: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct ApiConfig {
    /// Reservation backend root, e.g. `https://varaukset.example.fi/v1`
    #[validate(url(message = "API base URL must be a valid URL"))]
    pub base_url: String,
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct DisplayConfig {
    /// Language used for localized names and descriptions
    #[validate(length(min = 2, max = 5, message = "Language code must be 2-5 characters"))]
    pub language: String,
    /// IANA name of the time zone form dates are entered in
    #[validate(length(min = 1))]
    pub time_zone: String,
}

impl DisplayConfig {
    pub fn time_zone(&self) -> AppResult<Tz> {
        self.time_zone.parse::<Tz>().map_err(|e| {
            AppError::Config(format!("Unknown time zone '{}': {}", self.time_zone, e))
        })
    }
}

#[derive(Debug, Deserialize, Clone, Default, Validate)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON array of boat resources
    pub resources_path: Option<PathBuf>,
    /// JSON array of units
    pub units_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub storage: StorageConfig,
    #[validate(nested)]
    pub api: ApiConfig,
    #[validate(nested)]
    pub display: DisplayConfig,
    #[validate(nested)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (e.g. VARAUS_API__BASE_URL)
            .add_source(
                Environment::with_prefix("VARAUS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/local_storage.json"),
            filter_key: "boat_reservation_filters".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "fi".to_string(),
            time_zone: "Europe/Helsinki".to_string(),
        }
    }
}
