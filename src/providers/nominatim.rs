use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{Adapter, PlaceQuery, build_client};
use crate::config::NearbyAiConfig;
use crate::models::Place;
use crate::models::location::SEARCH_ZOOM;
use crate::ranking::{PlaceRow, normalize_rows};
use crate::{NearbyAiError, Result};

/// Nominatim place search restricted to a box around the user
pub struct NominatimClient {
    client: Client,
    base_url: String,
    radius_deg: f64,
    limit: u32,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(config: &NearbyAiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(
                &config.providers.user_agent,
                config.providers.places_timeout(),
            )?,
            base_url: config.providers.nominatim_url.trim_end_matches('/').to_string(),
            radius_deg: config.search.radius_deg,
            limit: config.search.result_limit,
        })
    }

    /// `left,top,right,bottom` box of half-width `radius_deg` around the query center
    fn viewbox(&self, query: &PlaceQuery) -> String {
        let lat = query.center.latitude;
        let lon = query.center.longitude;
        let r = self.radius_deg;
        format!("{},{},{},{}", lon - r, lat - r, lon + r, lat + r)
    }

    /// Search and normalize, surfacing failures to the caller
    #[instrument(skip(self, query), fields(q = %query.query))]
    pub async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>> {
        let start_time = Instant::now();
        let url = format!("{}/search", self.base_url);
        let viewbox = self.viewbox(query);
        let limit = self.limit.to_string();

        debug!("Nominatim request: {} viewbox={}", url, viewbox);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.query.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("viewbox", viewbox.as_str()),
                ("bounded", "1"),
                ("extratags", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NearbyAiError::api(format!(
                "Nominatim search failed with status {status}"
            )));
        }

        let rows: Vec<PlaceRow> = response.json().await?;
        let places = normalize_rows(rows, SEARCH_ZOOM);

        info!(
            "Found {} places for '{}' in {:.3}s",
            places.len(),
            query.query,
            start_time.elapsed().as_secs_f64()
        );

        Ok(places)
    }
}

#[async_trait]
impl Adapter<PlaceQuery, Vec<Place>> for NominatimClient {
    async fn call(&self, input: PlaceQuery) -> Vec<Place> {
        match self.search(&input).await {
            Ok(places) => places,
            Err(e) => {
                warn!("Place search failed, returning no places: {}", e);
                Vec::new()
            }
        }
    }
}
