//! Transport legs and route suggestions

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Distances up to this many km are walkable
pub const WALK_LIMIT_KM: f64 = 0.5;
/// Distances up to this many km suit an auto or taxi
pub const TAXI_LIMIT_KM: f64 = 2.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Bus,
    Rail,
    Walk,
    FallbackWalk,
    FallbackTaxi,
    FallbackMetro,
}

impl TransportMode {
    /// Bucket a straight-line distance into a recommended fallback mode.
    /// Boundaries belong to the lower bucket.
    #[must_use]
    pub fn recommend_for_distance(distance_km: f64) -> Self {
        if distance_km <= WALK_LIMIT_KM {
            TransportMode::FallbackWalk
        } else if distance_km <= TAXI_LIMIT_KM {
            TransportMode::FallbackTaxi
        } else {
            TransportMode::FallbackMetro
        }
    }
}

/// Transit label; an unnamed route leaves out the route segment
fn transit_label(icon: &str, route: &str, distance_km: f64) -> String {
    let route = route.trim();
    if route.is_empty() {
        format!("{icon} {distance_km:.1} km")
    } else {
        format!("{icon} {route} {distance_km:.1} km")
    }
}

/// One step of an itinerary, or a synthesized recommendation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransportLeg {
    pub mode: TransportMode,
    pub distance_km: f64,
    pub label: String,
}

impl TransportLeg {
    #[must_use]
    pub fn bus(route: &str, distance_km: f64) -> Self {
        Self {
            mode: TransportMode::Bus,
            distance_km,
            label: transit_label("🚌", route, distance_km),
        }
    }

    #[must_use]
    pub fn rail(route: &str, distance_km: f64) -> Self {
        Self {
            mode: TransportMode::Rail,
            distance_km,
            label: transit_label("🚇", route, distance_km),
        }
    }

    #[must_use]
    pub fn walk(distance_km: f64) -> Self {
        Self {
            mode: TransportMode::Walk,
            distance_km,
            label: format!("🚶 {distance_km:.1} km"),
        }
    }

    /// Recommendation derived from straight-line distance alone
    #[must_use]
    pub fn fallback(distance_km: f64) -> Self {
        let mode = TransportMode::recommend_for_distance(distance_km);
        let label = match mode {
            TransportMode::FallbackWalk => format!("**🚶 {distance_km:.1} km — Walking.**"),
            TransportMode::FallbackTaxi => {
                format!("**🛵 {distance_km:.1} km — Auto/taxi recommended.**")
            }
            _ => format!("**🚇 {distance_km:.1} km — Metro recommended.**"),
        };
        Self {
            mode,
            distance_km,
            label,
        }
    }
}

impl Display for TransportLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Route advice for one destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum RouteSuggestion {
    /// Legs of the first itinerary, possibly empty
    Itinerary(Vec<TransportLeg>),
    /// Single synthesized leg used when no itinerary could be fetched
    Fallback(TransportLeg),
}

impl RouteSuggestion {
    #[must_use]
    pub fn legs(&self) -> &[TransportLeg] {
        match self {
            RouteSuggestion::Itinerary(legs) => legs,
            RouteSuggestion::Fallback(leg) => std::slice::from_ref(leg),
        }
    }
}

impl Display for RouteSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let legs = self.legs();
        if legs.is_empty() {
            return f.write_str("No route found");
        }
        for (i, leg) in legs.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            write!(f, "{leg}")?;
        }
        Ok(())
    }
}
