//! Panel error slots and banner
//!
//! Three independent slots; the banner shows the most relevant one.

use serde::{Deserialize, Serialize};

use crate::session::SessionError;
use crate::transport::TransportError;

/// Message shown when a slot is set without any text
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred while loading the assistant.";

/// Which part of the embed failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetErrorKind {
    #[serde(rename = "script_error")]
    Script,
    #[serde(rename = "session_error")]
    Session,
    #[serde(rename = "integration_error")]
    Integration,
}

/// Error banner contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub kind: WidgetErrorKind,
    pub message: String,
}

/// Local error state of the panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub script: Option<String>,
    pub session: Option<String>,
    pub integration: Option<String>,
}

impl ErrorState {
    fn slot_mut(&mut self, kind: WidgetErrorKind) -> &mut Option<String> {
        match kind {
            WidgetErrorKind::Script => &mut self.script,
            WidgetErrorKind::Session => &mut self.session,
            WidgetErrorKind::Integration => &mut self.integration,
        }
    }

    /// Fill a slot; blank messages become the generic message
    pub fn record(&mut self, kind: WidgetErrorKind, message: Option<String>) {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
        *self.slot_mut(kind) = Some(message);
    }

    pub fn clear(&mut self, kind: WidgetErrorKind) {
        *self.slot_mut(kind) = None;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_none() && self.session.is_none() && self.integration.is_none()
    }

    /// First set slot in the order script, session, integration
    pub fn banner(&self) -> Option<Banner> {
        [
            (WidgetErrorKind::Script, &self.script),
            (WidgetErrorKind::Session, &self.session),
            (WidgetErrorKind::Integration, &self.integration),
        ]
        .into_iter()
        .find_map(|(kind, slot)| {
            slot.as_ref().map(|message| Banner {
                kind,
                message: message.clone(),
            })
        })
    }
}

/// Errors surfaced by the panel's credential callback
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// In-process session minting failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The session endpoint answered with an error status
    #[error("Session API error: {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session endpoint answered 2xx without a usable secret
    #[error("Malformed session response: {0}")]
    MalformedResponse(String),
}
