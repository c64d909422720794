//! Configuration management for the `NearbyAI` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::NearbyAiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `NearbyAI` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyAiConfig {
    /// External provider endpoints and timeouts
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Place search settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP surface settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// External provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL of the Nominatim search service
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    /// Base URL of the Open-Meteo API
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,
    /// Base URL of the OpenTripPlanner router
    #[serde(default = "default_otp_url")]
    pub otp_url: String,
    /// User agent sent to every provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for place searches in seconds
    #[serde(default = "default_places_timeout")]
    pub places_timeout_seconds: u32,
    /// Timeout for weather lookups in seconds
    #[serde(default = "default_weather_timeout")]
    pub weather_timeout_seconds: u32,
    /// Timeout for itinerary requests in seconds
    #[serde(default = "default_route_timeout")]
    pub route_timeout_seconds: u32,
}

/// Place search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Half-width of the search box in degrees
    #[serde(default = "default_radius_deg")]
    pub radius_deg: f64,
    /// Maximum number of candidates requested
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Number of places kept for reviews and routing
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_open_meteo_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_otp_url() -> String {
    "http://localhost:8080/otp/routers/default".to_string()
}

fn default_user_agent() -> String {
    "multi-agent-app".to_string()
}

fn default_places_timeout() -> u32 {
    10
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_route_timeout() -> u32 {
    5
}

fn default_radius_deg() -> f64 {
    0.05
}

fn default_result_limit() -> u32 {
    15
}

fn default_top_n() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            open_meteo_url: default_open_meteo_url(),
            otp_url: default_otp_url(),
            user_agent: default_user_agent(),
            places_timeout_seconds: default_places_timeout(),
            weather_timeout_seconds: default_weather_timeout(),
            route_timeout_seconds: default_route_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_deg: default_radius_deg(),
            result_limit: default_result_limit(),
            top_n: default_top_n(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl ProvidersConfig {
    #[must_use]
    pub fn places_timeout(&self) -> Duration {
        Duration::from_secs(self.places_timeout_seconds.into())
    }

    #[must_use]
    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_seconds.into())
    }

    #[must_use]
    pub fn route_timeout(&self) -> Duration {
        Duration::from_secs(self.route_timeout_seconds.into())
    }
}

impl NearbyAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // NEARBYAI_PROVIDERS__OTP_URL=... style overrides
        builder = builder.add_source(
            Environment::with_prefix("NEARBYAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: NearbyAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nearbyai").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.nominatim_url.is_empty() {
            self.providers.nominatim_url = default_nominatim_url();
        }
        if self.providers.open_meteo_url.is_empty() {
            self.providers.open_meteo_url = default_open_meteo_url();
        }
        if self.providers.otp_url.is_empty() {
            self.providers.otp_url = default_otp_url();
        }
        if self.providers.user_agent.is_empty() {
            self.providers.user_agent = default_user_agent();
        }
        if self.providers.places_timeout_seconds == 0 {
            self.providers.places_timeout_seconds = default_places_timeout();
        }
        if self.providers.weather_timeout_seconds == 0 {
            self.providers.weather_timeout_seconds = default_weather_timeout();
        }
        if self.providers.route_timeout_seconds == 0 {
            self.providers.route_timeout_seconds = default_route_timeout();
        }
        if self.search.result_limit == 0 {
            self.search.result_limit = default_result_limit();
        }
        if self.search.top_n == 0 {
            self.search.top_n = default_top_n();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("Nominatim", &self.providers.nominatim_url),
            ("Open-Meteo", &self.providers.open_meteo_url),
            ("OpenTripPlanner", &self.providers.otp_url),
        ];

        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NearbyAiError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            self.providers.places_timeout_seconds,
            self.providers.weather_timeout_seconds,
            self.providers.route_timeout_seconds,
        ];
        if timeouts.iter().any(|t| *t > 300) {
            return Err(
                NearbyAiError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(self.search.radius_deg > 0.0 && self.search.radius_deg <= 1.0) {
            return Err(NearbyAiError::config(
                "Search radius must be greater than 0 and at most 1 degree",
            )
            .into());
        }

        if self.search.result_limit > 50 {
            return Err(NearbyAiError::config("Result limit cannot exceed 50").into());
        }

        if self.search.top_n > 10 {
            return Err(NearbyAiError::config("Top places cannot exceed 10").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NearbyAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NearbyAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
