//! Time-of-day greeting shown (and optionally spoken) when the panel mounts

use serde::Serialize;

/// Fixed welcome text that follows the salutation
pub const WELCOME_TEXT: &str = "welcome to the official website of WESCU. Here, a world of possibilities awaits you. We are committed to ensuring that your life is enriched with holistic prosperity, hope, and purpose. Whether you're exploring financial solutions, seeking guidance, or simply learning more about our services, know that you are valued and supported every step of the way. Welcome to WESCU\u{2014}where your journey toward sustainable success begins. How may I help you today?";

/// Greeting band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Morning starts at midnight: [0,12) morning, [12,17) afternoon,
    /// [17,21) evening, otherwise night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn salutation(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Good Morning",
            TimeOfDay::Afternoon => "Good Afternoon",
            TimeOfDay::Evening => "Good Evening",
            TimeOfDay::Night => "Good Night",
        }
    }
}

/// Full greeting for a local hour
pub fn greeting_for_hour(hour: u32) -> String {
    format!("{}, {}", TimeOfDay::from_hour(hour).salutation(), WELCOME_TEXT)
}
