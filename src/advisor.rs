//! Route advisor: one transport line per top-rated place

use futures::future::join_all;
use tracing::{debug, instrument};

use crate::models::{Coordinates, Place, RouteSuggestion};
use crate::providers::{Adapter, RouteRequest};

/// Transport body used when there is nothing to route to
pub const NO_TOP_PLACES: &str = "No top places found for routing.";

/// Advice for one destination
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRoute {
    pub name: String,
    pub suggestion: RouteSuggestion,
}

impl PlaceRoute {
    /// `<name> → <leg1> → <leg2> ...`
    #[must_use]
    pub fn line(&self) -> String {
        format!("{} → {}", self.name, self.suggestion)
    }
}

/// Request routes for every place concurrently. Output order follows `places`.
#[instrument(skip(router, places), fields(count = places.len()))]
pub async fn advise<R>(router: &R, user: Coordinates, places: &[Place]) -> Vec<PlaceRoute>
where
    R: Adapter<RouteRequest, RouteSuggestion> + ?Sized,
{
    let requests = places.iter().map(|place| async move {
        let suggestion = router
            .call(RouteRequest {
                origin: user,
                destination: place.coordinates,
            })
            .await;
        PlaceRoute {
            name: place.name.clone(),
            suggestion,
        }
    });

    let routes = join_all(requests).await;
    debug!("Advised {} routes", routes.len());
    routes
}

/// Join advice into the transport block, one line per place
#[must_use]
pub fn transport_block(routes: &[PlaceRoute]) -> String {
    if routes.is_empty() {
        return NO_TOP_PLACES.to_string();
    }
    routes
        .iter()
        .map(PlaceRoute::line)
        .collect::<Vec<_>>()
        .join("\n")
}
