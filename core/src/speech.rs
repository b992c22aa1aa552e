//! Text-to-speech for the spoken greeting
//!
//! The synthesizer runs server-side so the vendor credential never reaches
//! the browser.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::ServerConfig;
use crate::transport::{HttpTransport, TransportError};

/// Upstream speech path appended to the configured base URL
pub const SPEECH_PATH: &str = "/v1/audio/speech";

/// Speech errors
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Speech synthesis failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Speech request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Speech synthesis returned no audio")]
    EmptyAudio,
}

impl SpeechError {
    /// HTTP status for the greeting-audio route
    pub fn status_code(&self) -> u16 {
        match self {
            SpeechError::MissingApiKey => 500,
            SpeechError::Upstream { status, .. } => *status,
            SpeechError::Transport(_) | SpeechError::EmptyAudio => 502,
        }
    }
}

/// Turns text into encoded audio (mp3)
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

/// Vendor speech endpoint client
#[derive(Clone)]
pub struct OpenAiSpeech {
    api_key: Option<String>,
    api_base: String,
    model: String,
    voice: String,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiSpeech {
    pub fn new(config: &ServerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            api_base: config.api_base.clone(),
            model: config.speech.model.clone(),
            voice: config.speech.voice.clone(),
            transport,
        }
    }

    pub fn speech_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), SPEECH_PATH)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::MissingApiKey)?;

        let body = serde_json::to_string(&SpeechBody {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: "mp3",
        })
        .map_err(|e| SpeechError::Upstream {
            status: 500,
            message: e.to_string(),
        })?;
        let authorization = format!("Bearer {}", api_key);

        debug!("Synthesizing {} characters of speech", text.len());
        let response = self
            .transport
            .post_json(
                &self.speech_url(),
                &[("Authorization", authorization.as_str())],
                &body,
            )
            .await?;

        if !response.is_success() {
            error!("Speech upstream error (status {})", response.status);
            return Err(SpeechError::Upstream {
                status: response.status,
                message: response.text(),
            });
        }

        if response.body.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FakeTransport;

    fn config(api_key: Option<&str>) -> ServerConfig {
        ServerConfig {
            api_key: api_key.map(str::to_string),
            api_base: "http://vendor.test".to_string(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_synthesize_posts_greeting() {
        let transport = Arc::new(FakeTransport::with_bytes(200, vec![0xFF, 0xFB, 0x90]));
        let speech = OpenAiSpeech::new(&config(Some("sk-test")), transport.clone());

        let audio = speech.synthesize("Good Morning").await.unwrap();
        assert_eq!(audio, vec![0xFF, 0xFB, 0x90]);

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://vendor.test/v1/audio/speech");
        assert_eq!(sent.json()["input"], "Good Morning");
        assert_eq!(sent.json()["model"], "tts-1");
        assert_eq!(sent.json()["voice"], "alloy");
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_upstream() {
        let transport = Arc::new(FakeTransport::with_bytes(200, vec![1]));
        let speech = OpenAiSpeech::new(&config(None), transport.clone());

        let err = speech.synthesize("hi").await.unwrap_err();
        assert!(matches!(err, SpeechError::MissingApiKey));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upstream_status_is_kept() {
        let transport = Arc::new(FakeTransport::new(429, "slow down"));
        let speech = OpenAiSpeech::new(&config(Some("sk-test")), transport);

        let err = speech.synthesize("hi").await.unwrap_err();
        assert_eq!(err.status_code(), 429);
    }

    #[tokio::test]
    async fn test_empty_audio_is_an_error() {
        let transport = Arc::new(FakeTransport::with_bytes(200, Vec::new()));
        let speech = OpenAiSpeech::new(&config(Some("sk-test")), transport);

        let err = speech.synthesize("hi").await.unwrap_err();
        assert!(matches!(err, SpeechError::EmptyAudio));
    }
}
