//! Data models for the NearbyAI application
//!
//! This module contains the request-scoped domain values:
//! - Location: coordinates, validation and map links
//! - Place: points of interest with optional ratings
//! - Weather: current conditions with first-class absence
//! - Transport: itinerary legs and distance-based fallbacks

pub mod location;
pub mod place;
pub mod transport;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Coordinates;
pub use place::{DEFAULT_RATING, Place};
pub use transport::{RouteSuggestion, TransportLeg, TransportMode};
pub use weather::{NOT_AVAILABLE, WeatherReading};
