//! Coordinates model, parsing and map links

use serde::{Deserialize, Serialize};

use crate::NearbyAiError;

/// Zoom level used for links attached during ranking
pub const ASSEMBLY_ZOOM: u8 = 15;
/// Zoom level used for links produced by the place search
pub const SEARCH_ZOOM: u8 = 16;

/// A point in WGS84 decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(NearbyAiError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(NearbyAiError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse separate latitude and longitude inputs as typed by a user
    pub fn parse_pair(lat: &str, lon: &str) -> crate::Result<Self> {
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| NearbyAiError::validation("Invalid coordinates!"))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| NearbyAiError::validation("Invalid coordinates!"))?;
        Self::new(latitude, longitude)
    }

    /// Parse coordinates from a string like "46.8182,8.2275" or "46.8182 8.2275"
    pub fn parse(input: &str) -> crate::Result<Self> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        match parts.as_slice() {
            [lat, lon] => Self::parse_pair(lat, lon),
            _ => Err(NearbyAiError::validation(
                "Coordinates must be in format 'lat,lon'",
            )),
        }
    }

    /// Zero on either axis marks a provider row without usable coordinates
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.latitude == 0.0 || self.longitude == 0.0
    }

    /// OpenStreetMap link centered on this point
    #[must_use]
    pub fn map_link(&self, zoom: u8) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}&zoom={}",
            self.latitude, self.longitude, zoom
        )
    }

    /// Round coordinates for identity comparisons
    #[must_use]
    pub fn rounded_coordinates(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Straight-line distance in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude: other.latitude,
                longitude: other.longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
