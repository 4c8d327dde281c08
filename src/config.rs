//! Configuration for the Google Maps tools
//!
//! Read from the `[google_maps]` table of a TOML file. The API key may also
//! come from the `GOOGLE_MAPS_API_KEY` environment variable, which wins over
//! the file.

use crate::gateway::DEFAULT_TIMEOUT;
use crate::request::TravelMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File read when no explicit path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/gmaps-tools.toml";
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TRAVEL_MODE: &str = "driving";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// The place the assistant treats as "here"
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// ISO 3166 country code, used as the fallback region
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub default_language: Option<String>,
    pub default_region: Option<String>,
    pub default_travel_mode: Option<String>,
    pub home: Option<HomeLocation>,
    /// IANA zone used to interpret time phrases, e.g. `Europe/Berlin`
    pub time_zone: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_language: Some(DEFAULT_LANGUAGE.to_string()),
            default_region: None,
            default_travel_mode: Some(DEFAULT_TRAVEL_MODE.to_string()),
            home: None,
            time_zone: None,
            timeout_secs: Some(DEFAULT_TIMEOUT.as_secs()),
        }
    }
}

// keep the key out of logs
impl fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("default_language", &self.default_language)
            .field("default_region", &self.default_region)
            .field("default_travel_mode", &self.default_travel_mode)
            .field("home", &self.home)
            .field("time_zone", &self.time_zone)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl MapsConfig {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_PATH`] when it
    /// exists. A missing default file means defaults; a missing explicit file
    /// is an error. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        let config = config.with_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse the `[google_maps]` table; other tables are ignored
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct PartialConfig {
            google_maps: Option<MapsConfig>,
        }

        let partial: PartialConfig = toml::from_str(content)?;
        Ok(partial.google_maps.unwrap_or_default())
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(mode) = self.default_travel_mode.as_deref() {
            if TravelMode::parse(mode).is_none() {
                return Err(ConfigError::Invalid {
                    field: "default_travel_mode",
                    message: format!(
                        "'{}' is not one of {}",
                        mode,
                        TravelMode::NAMES.join(", ")
                    ),
                });
            }
        }
        if let Some(tz) = self.time_zone.as_deref() {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                return Err(ConfigError::Invalid {
                    field: "time_zone",
                    message: format!("unknown time zone '{}'", tz),
                });
            }
        }
        if let Some(home) = &self.home {
            if !(-90.0..=90.0).contains(&home.latitude) || !(-180.0..=180.0).contains(&home.longitude)
            {
                return Err(ConfigError::Invalid {
                    field: "home",
                    message: format!("({}, {}) is not a coordinate", home.latitude, home.longitude),
                });
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    /// Explicit language, else the configured default, else "en"
    pub fn language(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|l| !l.is_empty())
            .or(self.default_language.as_deref().filter(|l| !l.is_empty()))
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string()
    }

    /// Explicit region, else the configured default, else the home country
    pub fn region(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .filter(|r| !r.is_empty())
            .or(self.default_region.as_deref().filter(|r| !r.is_empty()))
            .or(self
                .home
                .as_ref()
                .and_then(|home| home.country.as_deref())
                .filter(|c| !c.is_empty()))
            .map(|r| r.to_lowercase())
    }

    /// Explicit mode, else the configured default, else "driving"
    pub fn travel_mode(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|m| !m.is_empty())
            .or(self.default_travel_mode.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or(DEFAULT_TRAVEL_MODE)
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}
