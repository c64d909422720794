//! `NearbyAI` - nearby places, weather and transit suggestions
//!
//! Provider adapters fetch places, weather and routes for a location. The
//! results are ranked, serialized into a tagged text blob for the agent,
//! and recovered from the agent's answer by a best-effort section parser
//! before being rendered into sidebar panels and a chat answer.

pub mod advisor;
pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod ranking;
pub mod render;
pub mod sections;
pub mod session;
pub mod web;

// Re-export core types for public API
pub use agent::{AgentEvent, AgentRequest, AgentRuntime, ToolAgent, collect_response};
pub use config::NearbyAiConfig;
pub use error::NearbyAiError;
pub use models::{Coordinates, Place, RouteSuggestion, TransportLeg, TransportMode, WeatherReading};
pub use pipeline::{HttpPipeline, Pipeline};
pub use providers::Adapter;
pub use render::{Rendered, SidebarPanels, render};
pub use sections::{ParsedResponse, compose, parse_response};
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NearbyAiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
