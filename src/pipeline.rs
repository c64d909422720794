//! Combined places, weather and routing tool
//!
//! One call runs the whole fetch side of a turn: weather and place search in
//! parallel, then ranking, then routing for the top places, and finally the
//! tagged blob handed to the agent.

use std::time::Instant;
use tracing::{info, instrument};

use crate::Result;
use crate::advisor::{PlaceRoute, advise, transport_block};
use crate::config::NearbyAiConfig;
use crate::models::{Coordinates, Place, RouteSuggestion, WeatherReading};
use crate::providers::{
    Adapter, NominatimClient, OpenMeteoClient, OtpClient, PlaceQuery, RouteRequest,
};
use crate::ranking::{Assembly, assemble};
use crate::sections::compose;

/// Everything fetched for one turn
#[derive(Debug, Clone, Default)]
pub struct Gathered {
    pub weather: WeatherReading,
    pub assembly: Assembly,
    pub routes: Vec<PlaceRoute>,
}

impl Gathered {
    /// Serialize into the tagged blob
    #[must_use]
    pub fn compose(&self) -> String {
        compose(&self.weather, &self.assembly, &transport_block(&self.routes))
    }
}

/// Provider pipeline, generic over the three adapter capabilities
pub struct Pipeline<P, W, R> {
    places: P,
    weather: W,
    router: R,
    top_n: usize,
}

/// Pipeline wired to the public HTTP providers
pub type HttpPipeline = Pipeline<NominatimClient, OpenMeteoClient, OtpClient>;

impl HttpPipeline {
    /// Build the HTTP adapters from configuration
    pub fn from_config(config: &NearbyAiConfig) -> Result<Self> {
        Ok(Pipeline::new(
            NominatimClient::new(config)?,
            OpenMeteoClient::new(config)?,
            OtpClient::new(config)?,
            config.search.top_n,
        ))
    }
}

impl<P, W, R> Pipeline<P, W, R>
where
    P: Adapter<PlaceQuery, Vec<Place>>,
    W: Adapter<Coordinates, WeatherReading>,
    R: Adapter<RouteRequest, RouteSuggestion>,
{
    pub fn new(places: P, weather: W, router: R, top_n: usize) -> Self {
        Self {
            places,
            weather,
            router,
            top_n,
        }
    }

    /// Fetch, rank and route for one location and query
    #[instrument(skip(self, query), fields(q = %query))]
    pub async fn gather(&self, at: Coordinates, query: &str) -> Gathered {
        let start_time = Instant::now();

        let search = PlaceQuery {
            center: at,
            query: query.to_string(),
        };
        let (weather, places) = futures::join!(self.weather.call(at), self.places.call(search));

        let assembly = assemble(places, self.top_n);
        let routes = advise(&self.router, at, &assembly.top).await;

        info!(
            "Gathered {} places and {} routes in {:.3}s",
            assembly.places.len(),
            routes.len(),
            start_time.elapsed().as_secs_f64()
        );

        Gathered {
            weather,
            assembly,
            routes,
        }
    }

    /// Fetch everything and return the tagged blob
    pub async fn run(&self, at: Coordinates, query: &str) -> String {
        self.gather(at, query).await.compose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportLeg;
    use crate::sections::parse::{DEFAULT_PLACES, DEFAULT_REVIEWS, DEFAULT_TRANSPORT};
    use crate::sections::parse_response;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedPlaces(Vec<Place>);

    #[async_trait]
    impl Adapter<PlaceQuery, Vec<Place>> for FixedPlaces {
        async fn call(&self, _input: PlaceQuery) -> Vec<Place> {
            self.0.clone()
        }
    }

    struct FixedWeather(WeatherReading);

    #[async_trait]
    impl Adapter<Coordinates, WeatherReading> for FixedWeather {
        async fn call(&self, _input: Coordinates) -> WeatherReading {
            self.0.clone()
        }
    }

    /// Records destinations and answers with a walk leg
    #[derive(Default)]
    struct RecordingRouter(Mutex<Vec<Coordinates>>);

    #[async_trait]
    impl Adapter<RouteRequest, RouteSuggestion> for RecordingRouter {
        async fn call(&self, input: RouteRequest) -> RouteSuggestion {
            self.0.lock().unwrap().push(input.destination);
            RouteSuggestion::Itinerary(vec![TransportLeg::walk(0.4)])
        }
    }

    fn place(name: &str, lat: f64, rating: Option<f64>) -> Place {
        Place {
            name: name.to_string(),
            coordinates: Coordinates {
                latitude: lat,
                longitude: 77.6,
            },
            rating,
            address: String::new(),
            link: String::new(),
        }
    }

    fn here() -> Coordinates {
        Coordinates::new(12.97, 77.59).unwrap()
    }

    #[tokio::test]
    async fn test_routes_only_top_places() {
        let places = vec![
            place("Low", 12.91, Some(2.0)),
            place("Best", 12.92, Some(4.9)),
            place("Unknown", 12.93, None),
            place("Good", 12.94, Some(4.2)),
        ];
        let pipeline = Pipeline::new(
            FixedPlaces(places),
            FixedWeather(WeatherReading::default()),
            RecordingRouter::default(),
            3,
        );

        let gathered = pipeline.gather(here(), "cafe").await;

        let routed: Vec<f64> = pipeline
            .router
            .0
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.latitude)
            .collect();
        assert_eq!(routed.len(), 3);
        assert!(routed.contains(&12.92) && routed.contains(&12.94) && routed.contains(&12.93));
        let names: Vec<_> = gathered.routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Best", "Good", "Unknown"]);
    }

    #[tokio::test]
    async fn test_blob_parses_back() {
        let weather = WeatherReading {
            temperature: Some(29.0),
            wind: Some(6.5),
            alert: None,
        };
        let pipeline = Pipeline::new(
            FixedPlaces(vec![place("Toit", 12.979, Some(4.7))]),
            FixedWeather(weather.clone()),
            RecordingRouter::default(),
            3,
        );

        let parsed = parse_response(&pipeline.run(here(), "pubs").await);

        assert_eq!(parsed.weather, weather);
        assert!(parsed.places.starts_with("• Toit ([map]("));
        assert!(parsed.reviews.starts_with("⭐ 4.7 — Toit"));
        assert_eq!(parsed.transport, "Toit → 🚶 0.4 km");
    }

    #[tokio::test]
    async fn test_no_places_means_no_routing() {
        let pipeline = Pipeline::new(
            FixedPlaces(Vec::new()),
            FixedWeather(WeatherReading::default()),
            RecordingRouter::default(),
            3,
        );

        let parsed = parse_response(&pipeline.run(here(), "ice rink").await);

        assert!(pipeline.router.0.lock().unwrap().is_empty());
        assert_eq!(parsed.places, DEFAULT_PLACES);
        assert_eq!(parsed.reviews, DEFAULT_REVIEWS);
        assert_eq!(parsed.transport, DEFAULT_TRANSPORT);
    }
}
