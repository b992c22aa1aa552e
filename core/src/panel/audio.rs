//! Audio greeting affordance
//!
//! The greeting is synthesized and played at most once per mount, as a
//! fire-and-forget task. Toggling the affordance off, or unmounting, cancels
//! the task wherever it is (synthesis or playback). Toggling back on does not
//! replay the greeting.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::speech::SpeechSynthesizer;

/// Audio output errors
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio playback failed: {0}")]
    Playback(String),
}

/// Plays encoded audio. Dropping the `play` future stops output.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: Vec<u8>) -> Result<(), AudioError>;
}

/// Greeting playback state for one panel mount
pub struct AudioGreeting {
    enabled: bool,
    played: bool,
    cancel: Option<CancellationToken>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: Arc<dyn AudioSink>,
}

impl AudioGreeting {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            enabled: true,
            played: false,
            cancel: None,
            synthesizer,
            sink,
        }
    }

    /// Start disabled
    pub fn muted(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_played(&self) -> bool {
        self.played
    }

    /// Flip the affordance; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.stop();
        }
        self.enabled
    }

    /// Speak `text` unless muted or already spoken this mount.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn play_greeting(&mut self, text: impl Into<String>) -> Option<JoinHandle<()>> {
        if !self.enabled || self.played {
            return None;
        }
        self.played = true;

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let text = text.into();
        let synthesizer = self.synthesizer.clone();
        let sink = self.sink.clone();

        Some(tokio::spawn(async move {
            let audio = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Greeting cancelled before synthesis finished");
                    return;
                }
                result = synthesizer.synthesize(&text) => result,
            };

            let audio = match audio {
                Ok(audio) => audio,
                Err(e) => {
                    warn!("Greeting synthesis failed: {}", e);
                    return;
                }
            };

            tokio::select! {
                _ = token.cancelled() => debug!("Greeting playback stopped"),
                result = sink.play(audio) => {
                    if let Err(e) = result {
                        warn!("{}", e);
                    }
                }
            }
        }))
    }

    /// Cancel whatever is in flight
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }

    /// Panel is going away
    pub fn unmount(&mut self) {
        self.stop();
    }
}

impl Drop for AudioGreeting {
    fn drop(&mut self) {
        self.stop();
    }
}
