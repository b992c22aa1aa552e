//! Wire types for the session endpoint and the pinned upstream contract
//!
//! Upstream version: `OpenAI-Beta: chatkit_beta=v1`.

use serde::{Deserialize, Serialize};

use crate::identity::UserIdentity;
use crate::session::errors::SessionError;

/// Upstream path appended to the configured base URL
pub const SESSIONS_PATH: &str = "/v1/chatkit/sessions";

/// Vendor versioning header
pub const BETA_HEADER: &str = "OpenAI-Beta";
pub const BETA_HEADER_VALUE: &str = "chatkit_beta=v1";

/// Body accepted by `POST /api/chatkit/session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
}

impl SessionRequest {
    pub fn for_user(user: UserIdentity) -> Self {
        Self { user: Some(user) }
    }
}

/// Successful reply of `POST /api/chatkit/session`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Upstream workflow reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileUploadConfig {
    pub enabled: bool,
}

/// Static feature block; file upload is always off
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatKitConfiguration {
    pub file_upload: FileUploadConfig,
}

/// Body of the upstream create-session call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSessionBody {
    pub workflow: WorkflowRef,
    /// Bare user identifier, not an object
    pub user: String,
    pub chatkit_configuration: ChatKitConfiguration,
}

impl CreateSessionBody {
    pub fn new(workflow_id: &str, user: &UserIdentity) -> Self {
        Self {
            workflow: WorkflowRef {
                id: workflow_id.to_string(),
            },
            user: user.id.clone(),
            chatkit_configuration: ChatKitConfiguration::default(),
        }
    }
}

/// Upstream create-session reply. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateSessionReply {
    pub client_secret: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub id: Option<String>,
}

impl CreateSessionReply {
    /// Decode an upstream JSON value against the pinned contract
    pub fn from_value(value: serde_json::Value) -> Result<Self, SessionError> {
        let reply: CreateSessionReply = serde_json::from_value(value)
            .map_err(|e| SessionError::ContractMismatch(e.to_string()))?;

        if reply.client_secret.trim().is_empty() {
            return Err(SessionError::ContractMismatch(
                "client_secret is empty".to_string(),
            ));
        }

        Ok(reply)
    }
}

impl From<CreateSessionReply> for SessionResponse {
    fn from(reply: CreateSessionReply) -> Self {
        Self {
            client_secret: reply.client_secret,
            expires_at: reply.expires_at,
        }
    }
}
