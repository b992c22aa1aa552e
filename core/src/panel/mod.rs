//! Chat panel model
//!
//! Headless version of the page's chat panel. It owns the behavior around the
//! embedded widget (never the widget itself):
//!
//! - answering the widget's credential callback, with a single fresh retry
//!   when a resumed thread turns out to be stale
//! - persisting and resuming the thread identifier through a `ThreadStore`
//! - three error slots and the banner derived from them
//! - the error boundary that decides when to re-render after a crash
//!
//! Storage failures are logged and swallowed; nothing here panics the host.

pub mod audio;
pub mod boundary;
pub mod errors;
pub mod secret;
pub mod storage;
pub mod theme;
pub mod widget;

pub use audio::{AudioError, AudioGreeting, AudioSink};
pub use boundary::{BoundaryAction, ErrorBoundary, RetryPolicy};
pub use errors::{Banner, ErrorState, PanelError, WidgetErrorKind};
pub use secret::{EndpointSecretSource, SecretSource, RESUME_HEADER};
pub use storage::{FileThreadStore, MemoryThreadStore, StorageError, ThreadStore, THREAD_STORAGE_KEY};
pub use theme::{ColorScheme, PanelConfig, ThemeOption, PLACEHOLDER_INPUT};
pub use widget::{FactAction, FactActionKind, PanelEffect, WidgetEvent};

use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::{local_hour, Clock, SystemClock};
use crate::config::DEFAULT_TIMEZONE;
use crate::greeting::greeting_for_hour;
use crate::identity::UserIdentity;

/// What the widget is given on mount
#[derive(Debug, Clone, PartialEq)]
pub struct MountPlan {
    /// Thread to restore, if one was persisted
    pub resume_thread: Option<String>,
    pub greeting: String,
    pub theme: ThemeOption,
    pub placeholder: &'static str,
}

/// One mounted chat panel
pub struct ChatPanel {
    store: Arc<dyn ThreadStore>,
    secrets: Arc<dyn SecretSource>,
    user: Option<UserIdentity>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    scheme: ColorScheme,
    errors: ErrorState,
    boundary: ErrorBoundary,
    resume_thread: Option<String>,
}

impl ChatPanel {
    pub fn new(store: Arc<dyn ThreadStore>, secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            store,
            secrets,
            user: None,
            clock: Arc::new(SystemClock),
            timezone: DEFAULT_TIMEZONE.parse().unwrap_or(chrono_tz::UTC),
            scheme: ColorScheme::default(),
            errors: ErrorState::default(),
            boundary: ErrorBoundary::default(),
            resume_thread: None,
        }
    }

    /// Identity forwarded with every secret request
    pub fn with_user(mut self, user: UserIdentity) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        self.clock = clock;
        self.timezone = timezone;
        self
    }

    /// Color scheme the page starts in
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.boundary = ErrorBoundary::new(policy);
        self
    }

    /// Read the persisted thread and compute what the widget is handed
    pub fn mount(&mut self) -> MountPlan {
        self.resume_thread = match self.store.load() {
            Ok(thread) => thread,
            Err(e) => {
                warn!("Could not read persisted chat thread: {}", e);
                None
            }
        };

        if self.resume_thread.is_some() {
            info!("Resuming persisted chat thread");
        } else {
            info!("Starting a new chat thread");
        }

        MountPlan {
            resume_thread: self.resume_thread.clone(),
            greeting: greeting_for_hour(local_hour(self.clock.as_ref(), self.timezone)),
            theme: ThemeOption::for_scheme(self.scheme),
            placeholder: PLACEHOLDER_INPUT,
        }
    }

    /// Credential callback for the widget.
    ///
    /// The first attempt carries the thread being resumed. When it fails, the
    /// persisted thread is cleared and one attempt is made without it. A
    /// final failure fills the session slot.
    pub async fn client_secret(&mut self) -> Result<String, PanelError> {
        let first = self
            .secrets
            .fetch_client_secret(self.user.as_ref(), self.resume_thread.as_deref())
            .await;

        let result = match first {
            Err(e) if self.resume_thread.is_some() => {
                warn!("Session creation failed while resuming, starting fresh: {}", e);
                self.reset_thread();
                self.secrets
                    .fetch_client_secret(self.user.as_ref(), None)
                    .await
            }
            other => other,
        };

        match result {
            Ok(secret) => {
                self.errors.clear(WidgetErrorKind::Session);
                Ok(secret)
            }
            Err(e) => {
                self.errors
                    .record(WidgetErrorKind::Session, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// React to a widget callback; returns what the host page should act on
    pub fn handle_event(&mut self, event: WidgetEvent) -> Vec<PanelEffect> {
        match event {
            WidgetEvent::ThreadChanged {
                thread_id: Some(thread_id),
            } if !thread_id.trim().is_empty() => {
                if let Err(e) = self.store.save(&thread_id) {
                    warn!("Could not persist chat thread: {}", e);
                }
                debug!("Chat thread changed");
                self.resume_thread = Some(thread_id.clone());
                vec![PanelEffect::ThreadIdChanged(thread_id)]
            }
            WidgetEvent::ThreadChanged { .. } => Vec::new(),
            WidgetEvent::Error { kind, message } => {
                warn!("Chat widget reported {:?} error: {:?}", kind, message);
                self.errors.record(kind, message);
                Vec::new()
            }
            WidgetEvent::ResponseEnd => vec![PanelEffect::ResponseEnded],
            WidgetEvent::ThemeRequest { scheme } => {
                self.scheme = scheme;
                vec![PanelEffect::ThemeRequested(scheme)]
            }
            WidgetEvent::WidgetAction { action } => match action.kind {
                FactActionKind::Save => vec![PanelEffect::SaveFact(action)],
            },
        }
    }

    /// The embed crashed; fills the integration slot and consults the boundary
    pub fn report_crash(&mut self, message: impl Into<String>) -> BoundaryAction {
        let message = message.into();
        self.errors
            .record(WidgetErrorKind::Integration, Some(message.clone()));
        self.boundary.on_failure(message)
    }

    /// The embed rendered again after a crash
    pub fn recovered(&mut self) {
        self.boundary.on_recovered();
        self.errors.clear(WidgetErrorKind::Integration);
    }

    /// Forget the persisted thread
    pub fn reset_thread(&mut self) {
        self.resume_thread = None;
        if let Err(e) = self.store.clear() {
            warn!("Could not clear persisted chat thread: {}", e);
        }
    }

    pub fn banner(&self) -> Option<Banner> {
        self.errors.banner()
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn resume_thread(&self) -> Option<&str> {
        self.resume_thread.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Answers from a script of results, recording the user and resume id
    /// of every call
    struct ScriptedSource {
        results: Mutex<VecDeque<Result<String, PanelError>>>,
        calls: Mutex<Vec<(Option<UserIdentity>, Option<String>)>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<Result<String, PanelError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn resumes(&self) -> Vec<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, resume)| resume.clone())
                .collect()
        }
    }

    #[async_trait]
    impl SecretSource for ScriptedSource {
        async fn fetch_client_secret(
            &self,
            user: Option<&UserIdentity>,
            resume: Option<&str>,
        ) -> Result<String, PanelError> {
            self.calls
                .lock()
                .unwrap()
                .push((user.cloned(), resume.map(str::to_string)));
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PanelError::MalformedResponse("script exhausted".into())))
        }
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl ThreadStore for BrokenStore {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("private mode".into()))
        }
        fn save(&self, _thread_id: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("private mode".into()))
        }
    }

    fn endpoint_error() -> PanelError {
        PanelError::Endpoint {
            status: 500,
            message: "boom".into(),
        }
    }

    #[test]
    fn test_thread_round_trip_across_remount() {
        let store = Arc::new(MemoryThreadStore::new());
        let source = ScriptedSource::new(vec![]);

        let mut panel = ChatPanel::new(store.clone(), source.clone());
        assert_eq!(panel.mount().resume_thread, None);
        let effect = panel.handle_event(WidgetEvent::ThreadChanged {
            thread_id: Some("thr_X".into()),
        });
        assert_eq!(effect, vec![PanelEffect::ThreadIdChanged("thr_X".into())]);
        drop(panel);

        let mut remounted = ChatPanel::new(store, source);
        assert_eq!(remounted.mount().resume_thread.as_deref(), Some("thr_X"));
    }

    #[test]
    fn test_new_thread_overwrites_persisted_value() {
        let store = Arc::new(MemoryThreadStore::with_thread("thr_old"));
        let mut panel = ChatPanel::new(store.clone(), ScriptedSource::new(vec![]));
        panel.mount();

        panel.handle_event(WidgetEvent::ThreadChanged {
            thread_id: Some("thr_new".into()),
        });
        assert_eq!(store.load().unwrap().as_deref(), Some("thr_new"));
    }

    #[test]
    fn test_empty_thread_change_is_ignored() {
        let store = Arc::new(MemoryThreadStore::with_thread("thr_keep"));
        let mut panel = ChatPanel::new(store.clone(), ScriptedSource::new(vec![]));

        assert_eq!(
            panel.handle_event(WidgetEvent::ThreadChanged { thread_id: None }),
            Vec::new()
        );
        assert_eq!(store.load().unwrap().as_deref(), Some("thr_keep"));
    }

    #[tokio::test]
    async fn test_client_secret_success_clears_session_slot() {
        let source = ScriptedSource::new(vec![Ok("sk_abc".into())]);
        let mut panel = ChatPanel::new(Arc::new(MemoryThreadStore::new()), source.clone())
            .with_user(UserIdentity::new("guest_42"));
        panel.handle_event(WidgetEvent::Error {
            kind: WidgetErrorKind::Session,
            message: Some("expired".into()),
        });

        assert_eq!(panel.client_secret().await.unwrap(), "sk_abc");
        assert!(panel.banner().is_none());
        assert_eq!(
            source.calls.lock().unwrap()[0],
            (Some(UserIdentity::new("guest_42")), None)
        );
    }

    #[tokio::test]
    async fn test_stale_resume_clears_storage_and_retries_once() {
        let store = Arc::new(MemoryThreadStore::with_thread("thr_stale"));
        let source = ScriptedSource::new(vec![Err(endpoint_error()), Ok("sk_fresh".into())]);
        let mut panel = ChatPanel::new(store.clone(), source.clone());
        panel.mount();

        assert_eq!(panel.client_secret().await.unwrap(), "sk_fresh");
        assert_eq!(source.calls(), 2);
        assert_eq!(source.resumes(), vec![Some("thr_stale".to_string()), None]);
        assert_eq!(store.load().unwrap(), None);
        assert!(panel.resume_thread().is_none());
    }

    #[tokio::test]
    async fn test_fresh_failure_is_not_retried() {
        let source = ScriptedSource::new(vec![Err(endpoint_error()), Ok("unused".into())]);
        let mut panel = ChatPanel::new(Arc::new(MemoryThreadStore::new()), source.clone());
        panel.mount();

        assert!(panel.client_secret().await.is_err());
        assert_eq!(source.calls(), 1);

        let banner = panel.banner().unwrap();
        assert_eq!(banner.kind, WidgetErrorKind::Session);
        assert!(banner.message.contains("500"));
    }

    #[tokio::test]
    async fn test_retry_happens_only_once() {
        let store = Arc::new(MemoryThreadStore::with_thread("thr_stale"));
        let source = ScriptedSource::new(vec![Err(endpoint_error()), Err(endpoint_error())]);
        let mut panel = ChatPanel::new(store, source.clone());
        panel.mount();

        assert!(panel.client_secret().await.is_err());
        assert_eq!(source.calls(), 2);
        assert!(panel.errors().session.is_some());
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let source = ScriptedSource::new(vec![Err(endpoint_error()), Ok("sk".into())]);
        let mut panel = ChatPanel::new(Arc::new(BrokenStore), source);

        assert_eq!(panel.mount().resume_thread, None);
        assert_eq!(
            panel.handle_event(WidgetEvent::ThreadChanged {
                thread_id: Some("thr_1".into())
            }),
            vec![PanelEffect::ThreadIdChanged("thr_1".into())]
        );
        panel.reset_thread();
        assert!(panel.banner().is_none());
    }

    #[test]
    fn test_widget_events_become_effects() {
        let mut panel = ChatPanel::new(
            Arc::new(MemoryThreadStore::new()),
            ScriptedSource::new(vec![]),
        );

        assert_eq!(
            panel.handle_event(WidgetEvent::ResponseEnd),
            vec![PanelEffect::ResponseEnded]
        );
        assert_eq!(
            panel.handle_event(WidgetEvent::ThemeRequest {
                scheme: ColorScheme::Dark
            }),
            vec![PanelEffect::ThemeRequested(ColorScheme::Dark)]
        );
        assert_eq!(panel.mount().theme, ThemeOption::for_scheme(ColorScheme::Dark));

        let action = FactAction {
            kind: FactActionKind::Save,
            fact_id: "f1".into(),
            fact_text: "Prefers email".into(),
        };
        assert_eq!(
            panel.handle_event(WidgetEvent::WidgetAction {
                action: action.clone()
            }),
            vec![PanelEffect::SaveFact(action)]
        );
    }

    #[test]
    fn test_crash_fills_integration_slot_until_recovered() {
        let mut panel = ChatPanel::new(
            Arc::new(MemoryThreadStore::new()),
            ScriptedSource::new(vec![]),
        )
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        });

        assert!(matches!(
            panel.report_crash("custom element threw"),
            BoundaryAction::Retry { attempt: 1, .. }
        ));
        assert_eq!(panel.banner().unwrap().kind, WidgetErrorKind::Integration);
        assert!(matches!(
            panel.report_crash("custom element threw"),
            BoundaryAction::GiveUp { attempts: 2 }
        ));

        panel.recovered();
        assert!(panel.banner().is_none());
    }

    #[test]
    fn test_mount_greeting_follows_clock() {
        // 23:30 UTC is 19:30 in Port of Spain
        let clock = Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap()));
        let mut panel = ChatPanel::new(
            Arc::new(MemoryThreadStore::new()),
            ScriptedSource::new(vec![]),
        )
        .with_clock(clock, chrono_tz::America::Port_of_Spain);

        assert!(panel.mount().greeting.starts_with("Good Evening"));
    }

    #[test]
    fn test_mount_hands_theme_and_placeholder() {
        let mut panel = ChatPanel::new(
            Arc::new(MemoryThreadStore::new()),
            ScriptedSource::new(vec![]),
        )
        .with_color_scheme(ColorScheme::Dark);

        let plan = panel.mount();
        assert_eq!(plan.theme, ThemeOption::for_scheme(ColorScheme::Dark));
        assert_eq!(plan.placeholder, PLACEHOLDER_INPUT);
    }

    #[tokio::test]
    async fn test_resume_id_reaches_endpoint_only_on_first_attempt() {
        use crate::transport::FakeTransport;

        let store = Arc::new(MemoryThreadStore::with_thread("thr_PERSISTED"));
        let transport = Arc::new(FakeTransport::new(500, r#"{"error":"thread expired"}"#));
        let source = Arc::new(EndpointSecretSource::new(
            "http://site.test/api/chatkit/session",
            transport.clone(),
        ));
        let mut panel = ChatPanel::new(store, source);
        panel.mount();

        assert!(panel.client_secret().await.is_err());

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].header(RESUME_HEADER), Some("thr_PERSISTED"));
        assert_eq!(requests[1].header(RESUME_HEADER), None);
    }
}
