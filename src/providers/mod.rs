//! Provider adapters
//!
//! Each adapter wraps one public HTTP API (Nominatim, Open-Meteo,
//! OpenTripPlanner) behind the [`Adapter`] capability. Adapters are
//! infallible by contract: network and decode failures are logged and
//! turned into an empty or neutral value before they reach the caller.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::models::Coordinates;
use crate::{NearbyAiError, Result};

pub mod nominatim;
pub mod open_meteo;
pub mod otp;

pub use nominatim::NominatimClient;
pub use open_meteo::OpenMeteoClient;
pub use otp::OtpClient;

/// A provider capability with a fixed invocation contract
#[async_trait]
pub trait Adapter<Input, Output>: Send + Sync
where
    Input: Send + 'static,
{
    /// Invoke the provider. Never fails; failures map to a neutral `Output`.
    async fn call(&self, input: Input) -> Output;
}

/// Input for the place search
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub center: Coordinates,
    pub query: String,
}

/// Input for itinerary requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
}

/// Build the shared HTTP client used by an adapter
pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| NearbyAiError::config(format!("Failed to create HTTP client: {e}")))
}
