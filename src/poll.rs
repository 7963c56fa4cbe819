//! Poll-with-timeout waiting on top of `tokio::time`
//!
//! UI state changes caused by synthetic input are not observable as events,
//! so the harness re-probes on an interval until a condition holds or the
//! deadline passes. Because everything goes through `tokio::time`, tests can
//! run with the clock paused and no real waits happen.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Result of a poll: the last probed value and whether it satisfied the condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polled<T> {
    pub value: T,
    pub satisfied: bool,
    pub attempts: u32,
}

/// Probe until `done` accepts the value or `timeout` elapses.
///
/// The probe always runs at least once, even with a zero timeout. The last
/// sleep is shortened so the final probe lands on the deadline.
pub async fn poll_until<T, F, Fut, D>(
    timeout: Duration,
    interval: Duration,
    mut probe: F,
    done: D,
) -> Polled<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    D: Fn(&T) -> bool,
{
    let deadline = Instant::now() + timeout;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let value = probe().await;

        if done(&value) {
            return Polled {
                value,
                satisfied: true,
                attempts,
            };
        }

        let now = Instant::now();
        if now >= deadline {
            log::debug!("Condition not met after {} attempt(s) in {:?}", attempts, timeout);
            return Polled {
                value,
                satisfied: false,
                attempts,
            };
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// Unconditional pause for UI transitions that have no probe
pub async fn settle(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
