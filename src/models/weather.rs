//! Weather reading model and display methods

use serde::{Deserialize, Serialize};

/// Placeholder shown for any value that could not be recovered
pub const NOT_AVAILABLE: &str = "N/A";

/// Current conditions at a point. Absent fields are unknown, never zero.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherReading {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Wind speed in km/h
    pub wind: Option<f64>,
    /// Active alert summary
    pub alert: Option<String>,
}

impl WeatherReading {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.wind.is_none() && self.alert.is_none()
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        self.temperature
            .map_or_else(|| NOT_AVAILABLE.to_string(), |t| format!("{t:.1}°C"))
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        self.wind
            .map_or_else(|| NOT_AVAILABLE.to_string(), |w| format!("{w:.1} km/h"))
    }

    #[must_use]
    pub fn format_alert(&self) -> String {
        self.alert
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}
