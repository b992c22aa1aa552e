//! Error boundary around the widget embed
//!
//! A widget crash never takes the host page down. Recovery follows an
//! explicit `RetryPolicy`: geometric backoff, capped, with a maximum number of
//! attempts after which the boundary gives up and leaves the banner up.

use std::time::Duration;
use tracing::{error, info};

/// Backoff policy for re-rendering the widget after a crash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            multiplier: 2,
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), or None once exhausted
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }

        let factor = self.multiplier.saturating_pow(attempt - 1);
        Some(self.initial_delay.saturating_mul(factor).min(self.max_delay))
    }
}

/// What the host should do after a widget failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAction {
    /// Re-render the widget after `after`
    Retry { attempt: u32, after: Duration },
    /// Stop re-rendering
    GiveUp { attempts: u32 },
}

/// Failure counter driven by `RetryPolicy`
#[derive(Debug, Clone, Default)]
pub struct ErrorBoundary {
    policy: RetryPolicy,
    failures: u32,
    last_error: Option<String>,
}

impl ErrorBoundary {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            failures: 0,
            last_error: None,
        }
    }

    /// Record a crash and decide what happens next
    pub fn on_failure(&mut self, message: impl Into<String>) -> BoundaryAction {
        let message = message.into();
        self.failures = self.failures.saturating_add(1);
        error!("Chat widget failed (attempt {}): {}", self.failures, message);
        self.last_error = Some(message);

        match self.policy.delay_for(self.failures) {
            Some(after) => BoundaryAction::Retry {
                attempt: self.failures,
                after,
            },
            None => BoundaryAction::GiveUp {
                attempts: self.failures,
            },
        }
    }

    /// The widget rendered fine again
    pub fn on_recovered(&mut self) {
        if self.failures > 0 {
            info!("Chat widget recovered after {} failure(s)", self.failures);
        }
        self.failures = 0;
        self.last_error = None;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.failures > self.policy.max_attempts
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delays_grow_and_cap() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_secs(8)));
        assert_eq!(policy.delay_for(4), None);
        assert_eq!(policy.delay_for(0), None);
    }

    #[test]
    fn test_cap_applies() {
        let policy = RetryPolicy {
            max_attempts: 10,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(10)));
        assert_eq!(policy.delay_for(10), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_boundary_gives_up_after_max_attempts() {
        let mut boundary = ErrorBoundary::new(RetryPolicy::default());

        for attempt in 1..=3 {
            match boundary.on_failure("render crashed") {
                BoundaryAction::Retry { attempt: n, .. } => assert_eq!(n, attempt),
                other => panic!("expected retry, got {:?}", other),
            }
        }

        assert_eq!(
            boundary.on_failure("render crashed"),
            BoundaryAction::GiveUp { attempts: 4 }
        );
        assert!(boundary.is_exhausted());
        assert_eq!(boundary.last_error(), Some("render crashed"));
    }

    #[test]
    fn test_recovery_resets_attempts() {
        let mut boundary = ErrorBoundary::default();
        boundary.on_failure("first");
        boundary.on_failure("second");
        boundary.on_recovered();

        assert_eq!(boundary.failures(), 0);
        assert!(boundary.last_error().is_none());
        assert_eq!(
            boundary.on_failure("third"),
            BoundaryAction::Retry {
                attempt: 1,
                after: Duration::from_secs(2)
            }
        );
    }

    #[test]
    fn test_failure_counter_saturates() {
        let mut boundary = ErrorBoundary {
            failures: u32::MAX,
            ..ErrorBoundary::default()
        };

        assert_eq!(
            boundary.on_failure("crash loop"),
            BoundaryAction::GiveUp { attempts: u32::MAX }
        );
        assert_eq!(boundary.failures(), u32::MAX);
    }
}
