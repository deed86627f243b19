//! Cancellable, deadline-bounded wait between two polls.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Fixed-interval polling with an overall time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub fn deadline_from(&self, start: Instant) -> Instant {
        start + self.timeout
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Why [`wait_tick`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// One interval elapsed; poll again.
    Ready,
    /// The deadline was reached.
    TimedOut,
    Cancelled,
}

/// Sleep one interval, waking early on cancellation and never past `deadline`.
pub async fn wait_tick(interval: Duration, deadline: Instant, cancel: &CancellationToken) -> Tick {
    if cancel.is_cancelled() {
        return Tick::Cancelled;
    }
    let now = Instant::now();
    if now >= deadline {
        return Tick::TimedOut;
    }
    let wake = (now + interval).min(deadline);

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Tick::Cancelled,
        _ = tokio::time::sleep_until(wake) => {
            if wake >= deadline {
                Tick::TimedOut
            } else {
                Tick::Ready
            }
        }
    }
}
