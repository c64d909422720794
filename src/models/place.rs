//! Place model

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Rating used whenever a place carries no usable rating
pub const DEFAULT_RATING: f64 = 3.5;

/// A point of interest returned by the place search
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub coordinates: Coordinates,
    /// Provider rating on a 0-5 scale, `None` when unknown
    pub rating: Option<f64>,
    /// Comma-separated address components, possibly empty
    pub address: String,
    pub link: String,
}

impl Place {
    /// Rating with the documented default applied
    #[must_use]
    pub fn effective_rating(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    /// Identity used for deduplication: name plus coordinates rounded to 4 decimals
    #[must_use]
    pub fn identity(&self) -> (String, i64, i64) {
        let (lat, lon) = self.coordinates.rounded_coordinates(4);
        // scaled to integers so the key is hashable
        (
            self.name.clone(),
            (lat * 10_000.0).round() as i64,
            (lon * 10_000.0).round() as i64,
        )
    }
}

/// Clamp a provider rating to the 0-5 scale, rejecting non-finite values
#[must_use]
pub fn sanitize_rating(raw: f64) -> Option<f64> {
    raw.is_finite().then(|| raw.clamp(0.0, 5.0))
}
