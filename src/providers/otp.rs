use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::{Adapter, RouteRequest, build_client};
use crate::config::NearbyAiConfig;
use crate::models::{RouteSuggestion, TransportLeg};
use crate::{NearbyAiError, Result};

/// Transit itineraries from an OpenTripPlanner router
pub struct OtpClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PlanResponse {
    plan: Option<Plan>,
}

#[derive(Debug, Deserialize)]
struct Plan {
    #[serde(default)]
    itineraries: Vec<Itinerary>,
}

#[derive(Debug, Deserialize)]
struct Itinerary {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    mode: String,
    /// Meters
    distance: f64,
    #[serde(default)]
    route: Option<String>,
}

impl Leg {
    fn to_transport_leg(&self) -> Option<TransportLeg> {
        let km = self.distance / 1000.0;
        let route = self.route.as_deref().unwrap_or_default();
        match self.mode.as_str() {
            "BUS" => Some(TransportLeg::bus(route, km)),
            "RAIL" => Some(TransportLeg::rail(route, km)),
            "WALK" => Some(TransportLeg::walk(km)),
            other => {
                debug!("Skipping unsupported leg mode {}", other);
                None
            }
        }
    }
}

impl OtpClient {
    /// Create a new client
    pub fn new(config: &NearbyAiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(
                &config.providers.user_agent,
                config.providers.route_timeout(),
            )?,
            base_url: config.providers.otp_url.trim_end_matches('/').to_string(),
        })
    }

    /// Legs of the first transit itinerary, surfacing failures to the caller
    #[instrument(skip(self))]
    pub async fn itinerary(&self, request: RouteRequest) -> Result<Vec<TransportLeg>> {
        let url = format!("{}/plan", self.base_url);
        let from = request.origin.to_string();
        let to = request.destination.to_string();

        debug!("OTP request: {} from {} to {}", url, from, to);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fromPlace", from.as_str()),
                ("toPlace", to.as_str()),
                ("mode", "TRANSIT,WALK"),
                ("numItineraries", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NearbyAiError::api(format!(
                "OTP request failed with status {status}"
            )));
        }

        let body: PlanResponse = response.json().await?;
        let itinerary = body
            .plan
            .and_then(|plan| plan.itineraries.into_iter().next())
            .ok_or_else(|| NearbyAiError::parse("No itinerary in OTP response"))?;

        Ok(itinerary
            .legs
            .iter()
            .filter_map(Leg::to_transport_leg)
            .collect())
    }
}

/// Straight-line recommendation used when no itinerary is available
#[must_use]
pub fn fallback_suggestion(request: &RouteRequest) -> RouteSuggestion {
    let distance = request.origin.distance_km(&request.destination);
    RouteSuggestion::Fallback(TransportLeg::fallback(distance))
}

#[async_trait]
impl Adapter<RouteRequest, RouteSuggestion> for OtpClient {
    async fn call(&self, input: RouteRequest) -> RouteSuggestion {
        match self.itinerary(input).await {
            Ok(legs) => RouteSuggestion::Itinerary(legs),
            Err(e) => {
                warn!("Routing failed, using distance fallback: {}", e);
                fallback_suggestion(&input)
            }
        }
    }
}
