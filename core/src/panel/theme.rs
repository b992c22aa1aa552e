//! Static widget configuration: theme, placeholder, starter prompts

use serde::{Deserialize, Serialize};

use crate::greeting::greeting_for_hour;

/// Composer placeholder
pub const PLACEHOLDER_INPUT: &str = "Ask anything...";

/// Same-origin path of the session endpoint
pub const CREATE_SESSION_ENDPOINT: &str = "/api/chatkit/session";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text_align: &'static str,
    pub font_size: &'static str,
    pub line_height: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typography {
    pub body: TextStyle,
    pub greeting: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLayout {
    pub padding: &'static str,
    pub max_width: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLayout {
    pub padding_top: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub message: MessageLayout,
    pub container: ContainerLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grayscale {
    pub hue: u16,
    pub tint: i8,
    pub shade: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accent {
    pub primary: &'static str,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeColor {
    pub grayscale: Grayscale,
    pub accent: Accent,
}

/// Theme handed to the widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeOption {
    pub typography: Typography,
    pub layout: Layout,
    pub color: ThemeColor,
    pub radius: &'static str,
}

impl ThemeOption {
    pub fn for_scheme(scheme: ColorScheme) -> Self {
        let dark = scheme == ColorScheme::Dark;

        Self {
            typography: Typography {
                body: TextStyle {
                    text_align: "left",
                    font_size: "14px",
                    line_height: "1.45",
                    margin_top: None,
                },
                greeting: TextStyle {
                    text_align: "left",
                    font_size: "15px",
                    line_height: "1.5",
                    margin_top: Some("4px"),
                },
            },
            layout: Layout {
                message: MessageLayout {
                    padding: "8px 12px",
                    max_width: "95%",
                },
                container: ContainerLayout { padding_top: "6px" },
            },
            color: ThemeColor {
                grayscale: Grayscale {
                    hue: 220,
                    tint: 6,
                    shade: if dark { -1 } else { -4 },
                },
                accent: Accent {
                    primary: if dark { "#f1f5f9" } else { "#0f172a" },
                    level: 1,
                },
            },
            radius: "round",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartScreenPrompt {
    pub label: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Everything the page needs to configure the embed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelConfig {
    pub workflow_id: Option<String>,
    pub session_endpoint: &'static str,
    pub greeting: String,
    pub placeholder: &'static str,
    pub starter_prompts: Vec<StartScreenPrompt>,
    pub theme: ThemeOption,
}

impl PanelConfig {
    /// Configuration for a local hour and color scheme. No starter prompts.
    pub fn new(workflow_id: Option<&str>, hour: u32, scheme: ColorScheme) -> Self {
        Self {
            workflow_id: workflow_id.map(str::to_string),
            session_endpoint: CREATE_SESSION_ENDPOINT,
            greeting: greeting_for_hour(hour),
            placeholder: PLACEHOLDER_INPUT,
            starter_prompts: Vec::new(),
            theme: ThemeOption::for_scheme(scheme),
        }
    }
}
