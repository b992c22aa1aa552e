//! Events crossing the embedded-widget boundary

use serde::{Deserialize, Serialize};

use crate::panel::errors::WidgetErrorKind;
use crate::panel::theme::ColorScheme;

/// Kind of fact action emitted by a widget button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactActionKind {
    Save,
}

/// Widget action payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactAction {
    #[serde(rename = "type")]
    pub kind: FactActionKind,
    #[serde(rename = "factId")]
    pub fact_id: String,
    #[serde(rename = "factText")]
    pub fact_text: String,
}

/// Callbacks the widget raises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    /// A thread was created or switched to
    ThreadChanged {
        #[serde(default)]
        thread_id: Option<String>,
    },
    Error {
        kind: WidgetErrorKind,
        #[serde(default)]
        message: Option<String>,
    },
    ResponseEnd,
    ThemeRequest {
        scheme: ColorScheme,
    },
    WidgetAction {
        action: FactAction,
    },
}

/// What the panel asks its parent page to do after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEffect {
    ThreadIdChanged(String),
    ResponseEnded,
    ThemeRequested(ColorScheme),
    SaveFact(FactAction),
}
