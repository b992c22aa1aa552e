//! Credential sources for the embedded widget
//!
//! The widget asks for a client secret through a callback; the panel answers
//! it from a `SecretSource`. Either the session service is called in-process,
//! or the public session endpoint is called over HTTP as a browser would.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::identity::UserIdentity;
use crate::panel::errors::PanelError;
use crate::session::{SessionRequest, SessionResponse, SessionService};
use crate::transport::HttpTransport;

/// Header carrying the thread the widget is about to resume
pub const RESUME_HEADER: &str = "x-session-id";

/// Anything that can produce a fresh client secret
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// `resume` is the persisted thread the widget will reopen, if any
    async fn fetch_client_secret(
        &self,
        user: Option<&UserIdentity>,
        resume: Option<&str>,
    ) -> Result<String, PanelError>;
}

#[async_trait]
impl SecretSource for SessionService {
    async fn fetch_client_secret(
        &self,
        user: Option<&UserIdentity>,
        resume: Option<&str>,
    ) -> Result<String, PanelError> {
        // Vendor sessions are not thread-scoped; the thread is reopened by the widget
        if resume.is_some() {
            debug!("Minting session for a resumed thread");
        }
        let request = SessionRequest {
            user: user.cloned(),
        };
        let response = self.create_session(Some(request)).await?;
        Ok(response.client_secret)
    }
}

/// Calls `POST <endpoint>` with `{ "user": ... }`, sending the resume id in
/// `x-session-id`
#[derive(Debug, Clone)]
pub struct EndpointSecretSource {
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl EndpointSecretSource {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SecretSource for EndpointSecretSource {
    async fn fetch_client_secret(
        &self,
        user: Option<&UserIdentity>,
        resume: Option<&str>,
    ) -> Result<String, PanelError> {
        let body = serde_json::to_string(&SessionRequest {
            user: user.cloned(),
        })
        .map_err(|e| PanelError::MalformedResponse(e.to_string()))?;

        let headers: Vec<(&str, &str)> = resume
            .filter(|thread| !thread.trim().is_empty())
            .map(|thread| vec![(RESUME_HEADER, thread)])
            .unwrap_or_default();

        let response = self
            .transport
            .post_json(&self.endpoint, &headers, &body)
            .await?;

        if !response.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| response.text());
            return Err(PanelError::Endpoint {
                status: response.status,
                message,
            });
        }

        let session: SessionResponse = response
            .json()
            .map_err(|e| PanelError::MalformedResponse(e.to_string()))?;

        if session.client_secret.trim().is_empty() {
            return Err(PanelError::MalformedResponse(
                "client_secret is empty".to_string(),
            ));
        }

        Ok(session.client_secret)
    }
}
