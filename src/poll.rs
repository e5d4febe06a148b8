// ABOUTME: Shared deadline and the fixed-interval poll combinator.
// ABOUTME: Every wait loop in verification goes through poll_until.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default interval between poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default overall deadline for one verification run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A point in time after which no further work is started.
///
/// One deadline is created per run and shared by every phase. `run` bounds a
/// single in-flight call so it is abandoned the moment the deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// A deadline at a fixed instant.
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left before the deadline, zero once elapsed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Drive `fut` until it completes or the deadline fires.
    ///
    /// Returns `None` when the deadline won; the future is dropped.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::time::timeout_at(self.at, fut).await.ok()
    }
}

/// Tagged outcome of a probe or of a whole poll.
///
/// Probes return `NotReady` to ask for another attempt. From `poll_until`,
/// `NotReady` means the deadline elapsed and carries the reason given by the
/// last observation, while `TimedOut` means no observation completed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T, E> {
    Ready(T),
    NotReady(String),
    TimedOut,
    Error(E),
}

/// Evaluate `probe` immediately and then every `interval` until it reports
/// `Ready` or `Error`, or `deadline` elapses.
///
/// A probe that is still running when the deadline fires is abandoned and no
/// further probe is started.
pub async fn poll_until<T, E, F, Fut>(
    deadline: &Deadline,
    interval: Duration,
    mut probe: F,
) -> PollOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollOutcome<T, E>>,
{
    let mut last_reason: Option<String> = None;

    let expired = |last_reason: Option<String>| match last_reason {
        Some(reason) => PollOutcome::NotReady(reason),
        None => PollOutcome::TimedOut,
    };

    loop {
        if deadline.is_elapsed() {
            return expired(last_reason);
        }

        match deadline.run(probe()).await {
            None => return expired(last_reason),
            Some(PollOutcome::NotReady(reason)) => {
                tracing::trace!(%reason, "not ready yet");
                last_reason = Some(reason);
            }
            Some(PollOutcome::TimedOut) => return expired(last_reason),
            Some(done) => return done,
        }

        if deadline.run(tokio::time::sleep(interval)).await.is_none() {
            return expired(last_reason);
        }
    }
}
