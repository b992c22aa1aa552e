//! API Handlers Module
//!
//! This module contains the request handlers for the chat API.

use axum::{
    body::Bytes,
    debug_handler,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use wescu_chat_core::panel::theme::{ColorScheme, PanelConfig, CREATE_SESSION_ENDPOINT};
use wescu_chat_core::{
    current_time as describe_time, greeting_for_hour, local_hour, Clock, ConfigError,
    HttpTransport, OpenAiSpeech, ServerConfig, SessionRequest, SessionResponse, SessionService,
    SpeechSynthesizer, SystemClock,
};

use crate::error::ApiError;

const WIDGET_TEMPLATE: &str = include_str!("../../assets/widget.js");

/// Represents the state of the API server
pub struct ApiState {
    /// Server configuration
    pub config: ServerConfig,
    /// Session minting
    pub sessions: SessionService,
    /// Greeting speech
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub clock: Arc<dyn Clock>,
    pub timezone: Tz,
}

impl ApiState {
    /// Build state with every upstream call going through `transport`
    pub fn new(config: ServerConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, ConfigError> {
        let timezone = config.tz()?;

        Ok(Self {
            sessions: SessionService::new(&config, transport.clone()),
            speech: Arc::new(OpenAiSpeech::new(&config, transport)),
            clock: Arc::new(SystemClock),
            timezone,
            config,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = speech;
        self
    }

    fn local_hour(&self) -> u32 {
        local_hour(self.clock.as_ref(), self.timezone)
    }
}

/// Health check endpoint
#[debug_handler]
pub async fn health_check() -> Json<HashMap<String, String>> {
    let mut response = HashMap::new();
    response.insert("status".to_string(), "healthy".to_string());
    response.insert("service".to_string(), "wescu-chat-api".to_string());
    Json(response)
}

/// Mint a client secret for the embedded widget
///
/// The body is optional. Anything that does not parse as a session request
/// is treated as "no identity supplied".
#[debug_handler]
pub async fn create_session(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<SessionResponse>, ApiError> {
    let request = parse_session_request(&body);
    let response = state.sessions.create_session(request).await?;
    Ok(Json(response))
}

fn parse_session_request(body: &[u8]) -> Option<SessionRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("No body sent, using fallback user");
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(request) => Some(request),
        Err(e) => {
            debug!("Unusable session body ({}), using fallback user", e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PanelConfigQuery {
    pub scheme: Option<ColorScheme>,
}

/// Static widget configuration for the page
#[debug_handler]
pub async fn panel_config(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PanelConfigQuery>,
) -> Json<PanelConfig> {
    Json(PanelConfig::new(
        state.config.workflow_id(),
        state.local_hour(),
        query.scheme.unwrap_or_default(),
    ))
}

/// Current time in the configured timezone; never cached
#[debug_handler]
pub async fn current_time(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")],
        Json(describe_time(state.clock.as_ref(), state.timezone)),
    )
}

/// Spoken greeting for the current hour, as mp3
#[debug_handler]
pub async fn greeting_audio(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, ApiError> {
    let greeting = greeting_for_hour(state.local_hour());
    let audio = state.speech.synthesize(&greeting).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        audio,
    ))
}

/// Embeddable loader script with the workflow id filled in
#[debug_handler]
pub async fn widget_script(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        render_widget_script(state.config.workflow_id().unwrap_or_default()),
    )
}

fn render_widget_script(workflow_id: &str) -> String {
    // JSON string literals are valid JavaScript string literals
    let quote = |value: &str| serde_json::Value::String(value.to_string()).to_string();

    WIDGET_TEMPLATE
        .replace("__WORKFLOW_ID__", &quote(workflow_id))
        .replace("__SESSION_PATH__", &quote(CREATE_SESSION_ENDPOINT))
}
