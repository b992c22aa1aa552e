//! Configuration Management Module
//!
//! Server configuration resolved in layers: built-in defaults, an optional
//! TOML file, then environment variable overrides. The API credential and the
//! workflow identifier stay optional here; the session endpoint reports their
//! absence per request instead of refusing to start.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default upstream vendor base URL
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Default timezone for greetings and the current-time route
pub const DEFAULT_TIMEZONE: &str = "America/Port_of_Spain";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Text-to-speech settings for the spoken greeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub model: String,
    pub voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
        }
    }
}

/// Main server configuration
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upstream API credential (OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Vendor workflow identifier
    pub workflow_id: Option<String>,
    /// Upstream base URL, without the `/v1/...` path
    pub api_base: String,
    /// IANA timezone name
    pub timezone: String,
    pub request_timeout_seconds: u64,
    pub speech: SpeechConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_key: None,
            workflow_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            request_timeout_seconds: 30,
            speech: SpeechConfig::default(),
        }
    }
}

// Redacts api_key
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("workflow_id", &self.workflow_id)
            .field("api_base", &self.api_base)
            .field("timezone", &self.timezone)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("speech", &self.speech)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration: file (explicit path, else the default location if
    /// present), then process environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Read a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// `<config_dir>/wescu-chat/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wescu-chat").join("config.toml"))
    }

    /// Apply environment overrides through `lookup`, so tests can supply a map
    /// instead of touching the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(api_key) = get("OPENAI_API_KEY") {
            self.api_key = Some(api_key);
            debug!("Applied env override for API key");
        }

        if let Some(workflow_id) = get("OPENAI_ASSISTANT_ID").or_else(|| get("CHATKIT_WORKFLOW_ID"))
        {
            self.workflow_id = Some(workflow_id);
            debug!("Applied env override for workflow ID");
        }

        if let Some(api_base) = get("CHATKIT_API_BASE") {
            self.api_base = api_base;
            debug!("Applied env override for API base");
        }

        if let Some(host) = get("WESCU_HOST") {
            self.host = host;
        }

        if let Some(port) = get("WESCU_PORT") {
            self.port = parse_value("WESCU_PORT", &port)?;
        }

        if let Some(timezone) = get("WESCU_TIMEZONE") {
            self.timezone = timezone;
        }

        if let Some(timeout) = get("WESCU_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_seconds = parse_value("WESCU_REQUEST_TIMEOUT_SECS", &timeout)?;
        }

        if let Some(model) = get("WESCU_TTS_MODEL") {
            self.speech.model = model;
        }

        if let Some(voice) = get("WESCU_TTS_VOICE") {
            self.speech.voice = voice;
        }

        Ok(())
    }

    /// Fail fast on values that would only break later, mid-request
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api_base).map_err(|e| ConfigError::InvalidValue {
            key: "api_base".to_string(),
            message: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "api_base".to_string(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        self.tz()?;

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "timezone".to_string(),
                message: e.to_string(),
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// API credential, if configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// Workflow identifier, if configured and non-blank
    pub fn workflow_id(&self) -> Option<&str> {
        non_blank(self.workflow_id.as_deref())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
