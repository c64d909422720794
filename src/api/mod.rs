use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::NearbyAiError;
use crate::agent::AgentRuntime;
use crate::render::SidebarPanels;
use crate::session::Session;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn AgentRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub lat: String,
    pub lon: String,
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub panels: SidebarPanels,
    pub answer: String,
    pub raw: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

impl IntoResponse for NearbyAiError {
    fn into_response(self) -> Response {
        let status = match &self {
            NearbyAiError::Validation { .. } => StatusCode::BAD_REQUEST,
            NearbyAiError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status != StatusCode::BAD_REQUEST {
            warn!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ask", get(ask))
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Json<AskResponse>, NearbyAiError> {
    let mut session = Session::new();
    session.set_location(&params.lat, &params.lon)?;

    let turn = session.submit(state.agent.as_ref(), &params.q, |_| {}).await?;

    Ok(Json(AskResponse {
        panels: turn.rendered.panels,
        answer: turn.rendered.answer,
        raw: turn.raw,
    }))
}
