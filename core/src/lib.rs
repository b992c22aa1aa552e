//! WESCU Chat Core Module
//!
//! Domain logic behind the website's embedded chat assistant: minting vendor
//! session credentials, the headless chat panel model, greetings, speech and
//! configuration. The HTTP surface lives in `wescu-chat-api`.

pub mod clock;
pub mod config;
pub mod greeting;
pub mod identity;
pub mod panel;
pub mod session;
pub mod speech;
pub mod transport;

pub use clock::{current_time, local_hour, Clock, CurrentTime, FixedClock, SystemClock};
pub use config::{ConfigError, ServerConfig, SpeechConfig};
pub use greeting::{greeting_for_hour, TimeOfDay};
pub use identity::UserIdentity;
pub use panel::{ChatPanel, MountPlan};
pub use session::{SessionError, SessionRequest, SessionResponse, SessionService};
pub use speech::{OpenAiSpeech, SpeechError, SpeechSynthesizer};
pub use transport::{FakeTransport, HttpTransport, ReqwestTransport, TransportError, TransportResponse};
