//! Session errors
//!
//! Error types for session minting, each carrying the HTTP status the
//! endpoint answers with.

use serde_json::Value;

use crate::transport::TransportError;

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No API credential configured
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    /// No workflow identifier configured
    #[error("Missing workflow ID")]
    MissingWorkflow,

    /// Vendor answered with a non-2xx status
    #[error("Upstream session request failed with status {status}")]
    Upstream { status: u16, details: Value },

    /// Vendor could not be reached
    #[error("Upstream request failed: {0}")]
    Transport(#[from] TransportError),

    /// Vendor answered 2xx with a body that is not JSON
    #[error("Upstream returned malformed JSON: {0}")]
    MalformedUpstream(String),

    /// Vendor answered 2xx JSON that does not match the pinned contract
    #[error("Upstream session response did not match the pinned contract: {0}")]
    ContractMismatch(String),
}

impl SessionError {
    /// HTTP status the session endpoint answers with
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::MissingApiKey => 500,
            SessionError::MissingWorkflow => 400,
            SessionError::Upstream { status, .. } => *status,
            SessionError::Transport(_) => 502,
            SessionError::MalformedUpstream(_) => 502,
            SessionError::ContractMismatch(_) => 500,
        }
    }

    /// Message exposed to the browser. Upstream and contract failures keep
    /// their internals in `details` or the server log.
    pub fn public_message(&self) -> String {
        match self {
            SessionError::MissingApiKey | SessionError::MissingWorkflow => self.to_string(),
            SessionError::Upstream { .. } => "Upstream session request failed".to_string(),
            SessionError::Transport(_) => "Upstream session service unreachable".to_string(),
            SessionError::MalformedUpstream(_) => {
                "Upstream session service returned an invalid response".to_string()
            }
            SessionError::ContractMismatch(_) => "Session contract mismatch".to_string(),
        }
    }

    /// Upstream error payload, when there is one
    pub fn details(&self) -> Option<&Value> {
        match self {
            SessionError::Upstream { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Configuration errors are terminal: nothing was sent upstream
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SessionError::MissingApiKey | SessionError::MissingWorkflow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_configuration_statuses() {
        assert_eq!(SessionError::MissingApiKey.status_code(), 500);
        assert_eq!(SessionError::MissingWorkflow.status_code(), 400);
        assert!(SessionError::MissingApiKey.is_configuration());
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            SessionError::MissingApiKey.public_message(),
            "Missing OPENAI_API_KEY"
        );
    }

    #[test]
    fn test_upstream_status_is_propagated() {
        let err = SessionError::Upstream {
            status: 429,
            details: json!({"error": {"message": "rate limited"}}),
        };
        assert_eq!(err.status_code(), 429);
        assert!(err.details().is_some());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_from_transport_error() {
        let err: SessionError = TransportError::Network("refused".to_string()).into();
        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(err.status_code(), 502);
    }
}
