//! Session service
//!
//! Checks configuration, resolves the visitor identity, calls the vendor once
//! and unwraps the client secret.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::identity::UserIdentity;
use crate::session::contract::{
    CreateSessionBody, CreateSessionReply, SessionRequest, SessionResponse, BETA_HEADER,
    BETA_HEADER_VALUE, SESSIONS_PATH,
};
use crate::session::errors::SessionError;
use crate::transport::HttpTransport;

/// Mints client secrets against the vendor session API
#[derive(Clone)]
pub struct SessionService {
    api_key: Option<String>,
    workflow_id: Option<String>,
    api_base: String,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("workflow_id", &self.workflow_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SessionService {
    /// Create a service from server configuration
    pub fn new(config: &ServerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            workflow_id: config.workflow_id().map(str::to_string),
            api_base: config.api_base.clone(),
            transport,
        }
    }

    /// Full upstream URL
    pub fn sessions_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), SESSIONS_PATH)
    }

    /// Mint a client secret.
    ///
    /// Configuration is checked before anything is sent: a missing credential
    /// or workflow identifier never reaches the vendor. Exactly one upstream
    /// attempt is made.
    pub async fn create_session(
        &self,
        request: Option<SessionRequest>,
    ) -> Result<SessionResponse, SessionError> {
        let api_key = self.api_key.as_deref().ok_or(SessionError::MissingApiKey)?;
        let workflow_id = self
            .workflow_id
            .as_deref()
            .ok_or(SessionError::MissingWorkflow)?;

        let user = UserIdentity::resolve(request.and_then(|r| r.user));
        debug!(
            "Creating chat session for {} user",
            if user.is_guest() { "guest" } else { "known" }
        );

        let body = serde_json::to_string(&CreateSessionBody::new(workflow_id, &user))
            .map_err(|e| SessionError::MalformedUpstream(e.to_string()))?;
        let authorization = format!("Bearer {}", api_key);
        let headers = [
            ("Authorization", authorization.as_str()),
            (BETA_HEADER, BETA_HEADER_VALUE),
        ];

        let response = self
            .transport
            .post_json(&self.sessions_url(), &headers, &body)
            .await
            .map_err(|e| {
                error!("Session upstream unreachable: {}", e);
                SessionError::Transport(e)
            })?;

        if !response.is_success() {
            let details = response
                .json::<serde_json::Value>()
                .unwrap_or_else(|_| serde_json::Value::String(response.text()));
            error!(
                "Session upstream error (status {}): {}",
                response.status, details
            );
            return Err(SessionError::Upstream {
                status: response.status,
                details,
            });
        }

        let value: serde_json::Value = response.json().map_err(|e| {
            error!("Session upstream returned malformed JSON: {}", e);
            SessionError::MalformedUpstream(e.to_string())
        })?;

        let reply = CreateSessionReply::from_value(value).map_err(|e| {
            error!("{}", e);
            e
        })?;

        info!(
            "Chat session created{}",
            reply
                .id
                .as_deref()
                .map(|id| format!(" ({})", id))
                .unwrap_or_default()
        );
        Ok(reply.into())
    }
}
