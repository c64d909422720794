//! Per-user conversation state

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::agent::{AgentRequest, AgentRuntime, collect_response};
use crate::models::Coordinates;
use crate::render::{Rendered, SidebarPanels, render};
use crate::sections::{ParsedResponse, parse_response};
use crate::{NearbyAiError, Result};

pub const INVALID_COORDINATES: &str = "Invalid coordinates!";
pub const LOCATION_REQUIRED: &str = "Please set your location first!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of one submitted turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    /// Text as the agent produced it
    pub raw: String,
    pub parsed: ParsedResponse,
    pub rendered: Rendered,
}

/// Location, chat history and the panels of the latest turn
#[derive(Debug, Default)]
pub struct Session {
    coordinates: Option<Coordinates>,
    messages: Vec<ChatMessage>,
    panels: Option<SidebarPanels>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn panels(&self) -> Option<&SidebarPanels> {
        self.panels.as_ref()
    }

    /// Set the location from separately typed latitude and longitude
    pub fn set_location(&mut self, lat: &str, lon: &str) -> Result<Coordinates> {
        let coordinates = Coordinates::parse_pair(lat, lon)
            .map_err(|_| NearbyAiError::validation(INVALID_COORDINATES))?;
        info!("Location set: {}", coordinates);
        self.coordinates = Some(coordinates);
        Ok(coordinates)
    }

    /// Set the location from a URL-encoded `lat,lng` value such as a
    /// `coords` query parameter. An already known location is kept.
    pub fn set_location_from_query(&mut self, value: &str) -> Result<Coordinates> {
        if let Some(existing) = self.coordinates {
            return Ok(existing);
        }

        let decoded = urlencoding::decode(value)
            .map_err(|_| NearbyAiError::validation(INVALID_COORDINATES))?;
        let coordinates = Coordinates::parse(&decoded)
            .map_err(|_| NearbyAiError::validation(INVALID_COORDINATES))?;

        info!("Location set from query: {}", coordinates);
        self.coordinates = Some(coordinates);
        Ok(coordinates)
    }

    /// Run one turn: stream the agent, parse its text, render both surfaces.
    ///
    /// A failed agent turn is rendered like an empty answer.
    #[instrument(skip(self, agent, on_partial))]
    pub async fn submit<A, F>(&mut self, agent: &A, prompt: &str, on_partial: F) -> Result<Turn>
    where
        A: AgentRuntime + ?Sized,
        F: FnMut(&str),
    {
        let coordinates = self
            .coordinates
            .ok_or_else(|| NearbyAiError::validation(LOCATION_REQUIRED))?;

        self.messages.push(ChatMessage::new(Role::User, prompt));

        let events = agent.run(AgentRequest::new(coordinates, prompt)).await;
        let raw = match collect_response(events, on_partial).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Agent turn failed, rendering defaults: {}", e);
                String::new()
            }
        };

        let parsed = parse_response(&raw);
        let rendered = render(&parsed, prompt);

        self.messages
            .push(ChatMessage::new(Role::Assistant, rendered.answer.clone()));
        self.panels = Some(rendered.panels.clone());

        Ok(Turn {
            raw,
            parsed,
            rendered,
        })
    }
}
