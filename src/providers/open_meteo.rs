use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::{Adapter, build_client};
use crate::config::NearbyAiConfig;
use crate::models::{Coordinates, WeatherReading};
use crate::{NearbyAiError, Result};

/// Current weather and alerts from the Open-Meteo forecast endpoint
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

/// `OpenMeteo` API response structures
mod openmeteo {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current_weather: Option<CurrentWeather>,
        /// `{"alert": [{"event": ...}]}` on some deployments
        pub weather_alerts: Option<Value>,
        /// `[{"event": ...}]` on others
        pub alerts: Option<Value>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub temperature: Option<f64>,
        pub windspeed: Option<f64>,
    }

    fn events_in(list: &Value) -> Vec<String> {
        list.as_array()
            .map(|alerts| {
                alerts
                    .iter()
                    .filter_map(|a| a.get("event").and_then(Value::as_str))
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    impl ForecastResponse {
        /// Alert event titles from whichever alert shape the response carries
        pub fn alert_events(&self) -> Vec<String> {
            let mut events = Vec::new();
            if let Some(alert_box) = &self.weather_alerts {
                events.extend(events_in(alert_box.get("alert").unwrap_or(&Value::Null)));
            }
            if let Some(alerts) = &self.alerts {
                events.extend(events_in(alerts));
            }
            events
        }
    }

    impl From<ForecastResponse> for WeatherReading {
        fn from(response: ForecastResponse) -> Self {
            let events = response.alert_events();
            let alert = (!events.is_empty()).then(|| format!("⚠️ {}", events.join(", ")));
            let (temperature, wind) = response
                .current_weather
                .map_or((None, None), |cw| (cw.temperature, cw.windspeed));

            WeatherReading {
                temperature,
                wind,
                alert,
            }
        }
    }
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(config: &NearbyAiConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(
                &config.providers.user_agent,
                config.providers.weather_timeout(),
            )?,
            base_url: config.providers.open_meteo_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current conditions, surfacing failures to the caller
    #[instrument(skip(self))]
    pub async fn current(&self, at: Coordinates) -> Result<WeatherReading> {
        let start_time = Instant::now();
        let url = format!("{}/forecast", self.base_url);
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();

        debug!("Open-Meteo request: {} at {}", url, at);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("weather_alerts", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NearbyAiError::api(format!(
                "Open-Meteo request failed with status {status}"
            )));
        }

        let forecast: openmeteo::ForecastResponse = response.json().await?;
        let reading = WeatherReading::from(forecast);

        info!(
            "Retrieved current weather in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(reading)
    }
}

#[async_trait]
impl Adapter<Coordinates, WeatherReading> for OpenMeteoClient {
    async fn call(&self, input: Coordinates) -> WeatherReading {
        match self.current(input).await {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Weather lookup failed, returning empty reading: {}", e);
                WeatherReading::default()
            }
        }
    }
}
