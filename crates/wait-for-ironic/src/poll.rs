use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::readiness::WaitOutcome;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Timing knobs shared by every wait in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Overall budget; the [`Deadline`] is `now + timeout`.
    pub timeout: Duration,
    /// Fixed sleep between failed attempts. Never grows.
    pub retry_interval: Duration,
    /// Cap on a single HTTP attempt, independent of the deadline.
    pub request_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Absolute cutoff for a wait. Established once, never extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Resolves once the deadline has passed.
    pub async fn expired(&self) {
        tokio::time::sleep_until(self.at).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pause {
    Elapsed,
    DeadlineExpired,
    Cancelled,
}

async fn pause(interval: Duration, deadline: Deadline, cancel: &CancellationToken) -> Pause {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Pause::Cancelled,
        _ = deadline.expired() => Pause::DeadlineExpired,
        _ = tokio::time::sleep(interval) => Pause::Elapsed,
    }
}

/// Run `attempt` at a fixed cadence until it returns `true`, the deadline
/// passes, or `cancel` fires.
///
/// Each attempt is capped at `settings.request_timeout`; a capped attempt
/// counts as a failure. Expiry and cancellation are observed between
/// attempts, so an attempt already in flight always runs to completion (or
/// to its own timeout).
pub async fn poll_until<F, Fut>(
    deadline: Deadline,
    settings: &PollSettings,
    cancel: &CancellationToken,
    mut attempt: F,
) -> WaitOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut attempts = 0;
    loop {
        if cancel.is_cancelled() {
            return WaitOutcome::Cancelled { attempts };
        }
        if deadline.is_expired() {
            return WaitOutcome::TimedOut { attempts };
        }

        attempts += 1;
        match tokio::time::timeout(settings.request_timeout, attempt()).await {
            Ok(true) => return WaitOutcome::Ready { attempts },
            Ok(false) => debug!(
                attempts,
                remaining = ?deadline.remaining(),
                "attempt failed, retrying"
            ),
            Err(_) => debug!(
                attempts,
                timeout = ?settings.request_timeout,
                remaining = ?deadline.remaining(),
                "attempt timed out"
            ),
        }

        match pause(settings.retry_interval, deadline, cancel).await {
            Pause::Elapsed => {}
            Pause::DeadlineExpired => return WaitOutcome::TimedOut { attempts },
            Pause::Cancelled => return WaitOutcome::Cancelled { attempts },
        }
    }
}
