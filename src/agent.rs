//! Streaming agent boundary
//!
//! The conversational model sits behind [`AgentRuntime`]. It receives the
//! user's prompt enriched with their location and answers with a stream of
//! text fragments that, once complete, should contain a tagged blob.
//! [`ToolAgent`] is the built-in runtime: it calls the combined tool and
//! streams the blob back unchanged.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::models::{Coordinates, Place, RouteSuggestion, WeatherReading};
use crate::pipeline::Pipeline;
use crate::providers::{Adapter, PlaceQuery, RouteRequest};
use crate::{NearbyAiError, Result};

/// One event of an agent turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// Partial text
    Fragment(String),
    /// Final event of a successful turn
    Completed,
    /// The turn ended with an error
    Failed(String),
}

/// A single user turn
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRequest {
    pub coordinates: Coordinates,
    pub query: String,
}

impl AgentRequest {
    pub fn new<S: Into<String>>(coordinates: Coordinates, query: S) -> Self {
        Self {
            coordinates,
            query: query.into(),
        }
    }

    /// Prompt text with the location prepended
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("My location is {}. {}", self.coordinates, self.query)
    }
}

/// An agent that answers a request with a stream of events
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn run(&self, request: AgentRequest) -> BoxStream<'static, AgentEvent>;
}

/// Buffer fragments until the turn ends.
///
/// `on_partial` sees the accumulated text after every fragment. A stream
/// that ends without `Completed` still yields what was received.
pub async fn collect_response<F>(
    mut events: BoxStream<'_, AgentEvent>,
    mut on_partial: F,
) -> Result<String>
where
    F: FnMut(&str),
{
    let mut buffer = String::new();

    while let Some(event) = events.next().await {
        match event {
            AgentEvent::Fragment(text) => {
                buffer.push_str(&text);
                on_partial(&buffer);
            }
            AgentEvent::Completed => return Ok(buffer),
            AgentEvent::Failed(reason) => {
                return Err(NearbyAiError::api(format!("Agent turn failed: {reason}")));
            }
        }
    }

    debug!("Agent stream ended without completion after {} bytes", buffer.len());
    Ok(buffer)
}

/// Runtime that answers every turn with the combined tool's blob
pub struct ToolAgent<P, W, R> {
    pipeline: Pipeline<P, W, R>,
}

impl<P, W, R> ToolAgent<P, W, R> {
    pub fn new(pipeline: Pipeline<P, W, R>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl<P, W, R> AgentRuntime for ToolAgent<P, W, R>
where
    P: Adapter<PlaceQuery, Vec<Place>>,
    W: Adapter<Coordinates, WeatherReading>,
    R: Adapter<RouteRequest, RouteSuggestion>,
{
    #[instrument(skip(self, request), fields(prompt = %request.prompt()))]
    async fn run(&self, request: AgentRequest) -> BoxStream<'static, AgentEvent> {
        if request.query.trim().is_empty() {
            warn!("Empty query, nothing to search for");
            return stream::iter([AgentEvent::Failed("empty query".to_string())]).boxed();
        }

        let blob = self
            .pipeline
            .run(request.coordinates, request.query.trim())
            .await;
        info!("Tool answered with {} bytes", blob.len());

        let fragments: Vec<AgentEvent> = blob
            .split_inclusive('\n')
            .map(|line| AgentEvent::Fragment(line.to_string()))
            .chain(std::iter::once(AgentEvent::Completed))
            .collect();
        stream::iter(fragments).boxed()
    }
}
