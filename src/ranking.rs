//! Ranking & assembly of place search results
//!
//! Raw provider rows are coerced into [`Place`] values here, and the
//! assembled list is reduced to the top-rated subset that feeds the
//! reviews and transport sections.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::models::location::ASSEMBLY_ZOOM;
use crate::models::place::sanitize_rating;
use crate::models::{Coordinates, Place};

/// Name used when the provider row carries none
pub const UNNAMED_PLACE: &str = "Unnamed Place";

/// One search result as the provider returns it. Every field is optional
/// and numbers may arrive as strings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PlaceRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
    #[serde(default)]
    pub address: Option<Map<String, Value>>,
    #[serde(default)]
    pub extratags: Option<HashMap<String, Value>>,
}

/// Places kept for one request together with their top-rated subset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub places: Vec<Place>,
    pub top: Vec<Place>,
}

impl Assembly {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Accept JSON numbers and numeric strings
#[must_use]
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

impl PlaceRow {
    /// Convert into a place, or `None` when the coordinates are unusable
    #[must_use]
    pub fn normalize(self, zoom: u8) -> Option<Place> {
        let latitude = self.lat.as_ref().and_then(coerce_f64)?;
        let longitude = self.lon.as_ref().and_then(coerce_f64)?;
        let coordinates = Coordinates {
            latitude,
            longitude,
        };
        if coordinates.is_missing() {
            return None;
        }

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or(self.display_name.filter(|n| !n.trim().is_empty()))
            .unwrap_or_else(|| UNNAMED_PLACE.to_string());

        let address = self
            .address
            .map(|components| {
                components
                    .values()
                    .filter_map(|v| v.as_str())
                    .filter(|v| !v.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let rating = self
            .extratags
            .as_ref()
            .and_then(|tags| tags.get("rating"))
            .and_then(coerce_f64)
            .and_then(sanitize_rating);

        Some(Place {
            link: coordinates.map_link(zoom),
            name,
            coordinates,
            rating,
            address,
        })
    }
}

/// Normalize provider rows, dropping those without usable coordinates
#[must_use]
pub fn normalize_rows(rows: Vec<PlaceRow>, zoom: u8) -> Vec<Place> {
    let total = rows.len();
    let places: Vec<Place> = rows.into_iter().filter_map(|r| r.normalize(zoom)).collect();
    if places.len() < total {
        debug!(
            "Dropped {} of {} rows without usable coordinates",
            total - places.len(),
            total
        );
    }
    places
}

/// Stable-sort descending by rating and keep the first `n`.
/// Equal ratings keep their provider order.
#[must_use]
pub fn top_rated(places: &[Place], n: usize) -> Vec<Place> {
    let mut sorted = places.to_vec();
    sorted.sort_by(|a, b| b.effective_rating().total_cmp(&a.effective_rating()));
    sorted.truncate(n);
    sorted
}

/// Validate, deduplicate and relink places, then select the top `top_n`
#[must_use]
pub fn assemble(places: Vec<Place>, top_n: usize) -> Assembly {
    let mut seen = HashSet::new();
    let places: Vec<Place> = places
        .into_iter()
        .filter(|p| !p.coordinates.is_missing())
        .filter(|p| seen.insert(p.identity()))
        .map(|mut p| {
            p.link = p.coordinates.map_link(ASSEMBLY_ZOOM);
            p
        })
        .collect();

    let top = top_rated(&places, top_n);
    debug!("Assembled {} places, {} selected", places.len(), top.len());

    Assembly { places, top }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::SEARCH_ZOOM;
    use rstest::rstest;
    use serde_json::json;

    fn place(name: &str, lat: f64, rating: Option<f64>) -> Place {
        Place {
            name: name.to_string(),
            coordinates: Coordinates {
                latitude: lat,
                longitude: 77.59,
            },
            rating,
            address: String::new(),
            link: String::new(),
        }
    }

    fn row(value: Value) -> PlaceRow {
        serde_json::from_value(value).unwrap()
    }

    #[rstest]
    #[case(json!(12.5), Some(12.5))]
    #[case(json!("12.5"), Some(12.5))]
    #[case(json!(" -3 "), Some(-3.0))]
    #[case(json!("abc"), None)]
    #[case(json!(null), None)]
    #[case(json!("NaN"), None)]
    fn test_coerce_f64(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(coerce_f64(&value), expected);
    }

    #[test]
    fn test_normalize_full_row() {
        let place = row(json!({
            "name": "Koshy's",
            "lat": "12.9756",
            "lon": "77.6010",
            "address": {"road": "St Marks Road", "suburb": "Shivajinagar", "city": "Bengaluru"},
            "extratags": {"rating": "4.4"}
        }))
        .normalize(SEARCH_ZOOM)
        .unwrap();

        assert_eq!(place.name, "Koshy's");
        assert_eq!(place.coordinates.latitude, 12.9756);
        assert_eq!(place.address, "St Marks Road, Shivajinagar, Bengaluru");
        assert_eq!(place.rating, Some(4.4));
        assert_eq!(
            place.link,
            "https://www.openstreetmap.org/?mlat=12.9756&mlon=77.601&zoom=16"
        );
    }

    #[test]
    fn test_normalize_defaults() {
        let place = row(json!({"name": "", "lat": "12.9", "lon": "77.5", "extratags": {"rating": "great"}}))
            .normalize(SEARCH_ZOOM)
            .unwrap();
        assert_eq!(place.name, UNNAMED_PLACE);
        assert_eq!(place.address, "");
        assert_eq!(place.rating, None);
        assert_eq!(place.effective_rating(), 3.5);

        let named = row(json!({"display_name": "Cubbon Park, Bengaluru", "lat": 12.97, "lon": 77.59}))
            .normalize(SEARCH_ZOOM)
            .unwrap();
        assert_eq!(named.name, "Cubbon Park, Bengaluru");
    }

    #[rstest]
    #[case(json!({"name": "Zero lat", "lat": "0", "lon": "77.5"}))]
    #[case(json!({"name": "Zero lon", "lat": "12.9", "lon": 0.0}))]
    #[case(json!({"name": "Bad lat", "lat": "north", "lon": "77.5"}))]
    #[case(json!({"name": "No coords"}))]
    fn test_normalize_drops_unusable_coordinates(#[case] value: Value) {
        assert!(row(value).normalize(SEARCH_ZOOM).is_none());
    }

    #[test]
    fn test_top_rated_sorts_descending() {
        let places = vec![
            place("A", 12.1, Some(3.0)),
            place("B", 12.2, Some(4.8)),
            place("C", 12.3, None),
            place("D", 12.4, Some(4.1)),
        ];
        let names: Vec<_> = top_rated(&places, 3).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn test_top_rated_keeps_provider_order_on_ties() {
        let places: Vec<Place> = ["first", "second", "third", "fourth", "fifth"]
            .iter()
            .enumerate()
            .map(|(i, name)| place(name, 12.0 + i as f64 / 10.0, None))
            .collect();
        let names: Vec<_> = top_rated(&places, 3).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);

        let mixed = vec![
            place("low", 12.1, Some(2.0)),
            place("tie-a", 12.2, Some(4.0)),
            place("tie-b", 12.3, Some(4.0)),
            place("tie-c", 12.4, Some(4.0)),
        ];
        let names: Vec<_> = top_rated(&mixed, 3).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["tie-a", "tie-b", "tie-c"]);
    }

    #[test]
    fn test_assemble_dedups_and_relinks() {
        let places = vec![
            place("Cafe", 12.97161, Some(4.0)),
            place("Cafe", 12.97164, Some(4.9)),
            place("Ghost", 0.0, Some(5.0)),
            place("Bakery", 12.98, None),
        ];
        let assembly = assemble(places, 3);

        assert_eq!(assembly.places.len(), 2);
        assert_eq!(assembly.places[0].rating, Some(4.0));
        assert!(assembly.places.iter().all(|p| p.link.ends_with("zoom=15")));
        assert_eq!(assembly.top[0].name, "Cafe");
        assert_eq!(assembly.top[1].name, "Bakery");
    }

    #[test]
    fn test_assemble_empty() {
        let assembly = assemble(Vec::new(), 3);
        assert!(assembly.is_empty());
        assert!(assembly.top.is_empty());
    }
}
