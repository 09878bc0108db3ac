//! Background task lifecycle management.
//!
//! [`LockoutCountdowns`] owns the countdown timers spawned while login
//! lockouts are active: one cancellable task per client key, ticking the
//! throttle once a second so a lockout clears on schedule even when the
//! client never comes back. Timers stop themselves when the lockout ends
//! and are cancelled on successful login or service shutdown.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::core::LoginThrottle;

/// Manages the per-key lockout countdown tasks.
#[derive(Default)]
pub struct LockoutCountdowns {
    tasks: DashMap<String, CancellationToken>,
}

impl LockoutCountdowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a countdown for `key` unless one is already running.
    ///
    /// The task ticks the throttle at a steady one-second cadence and exits
    /// as soon as the tick reports the lockout cleared.
    pub fn start(self: &Arc<Self>, throttle: Arc<LoginThrottle>, key: String) {
        let token = CancellationToken::new();
        match self.tasks.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(token.clone());
            }
        }

        let registry = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(config::COUNTDOWN_TICK_SECS));
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match throttle.tick(&key) {
                            Some(seconds_remaining) => {
                                tracing::debug!(%key, seconds_remaining, "Lockout countdown");
                            }
                            None => break,
                        }
                    }
                }
            }
            // A cancelled task was already removed by `cancel`/`shutdown`.
            if !token.is_cancelled() {
                registry.tasks.remove(&key);
            }
        });
    }

    /// Cancel the countdown for one key, if any.
    pub fn cancel(&self, key: &str) {
        if let Some((_, token)) = self.tasks.remove(key) {
            token.cancel();
        }
    }

    /// Cancel every running countdown (service teardown).
    pub fn shutdown(&self) {
        for entry in self.tasks.iter() {
            entry.value().cancel();
        }
        self.tasks.clear();
    }

    /// Number of countdowns currently running.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};

    use super::*;
    use crate::core::throttle::{Clock, MemoryAttemptStore};
    use crate::core::Gate;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new("2024-06-01T12:00:00Z".parse().unwrap()),
            })
        }

        fn advance_secs(&self, secs: i64) {
            let mut now = self.now.lock().unwrap();
            *now = *now + chrono::Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn locked_throttle(clock: Arc<ManualClock>) -> Arc<LoginThrottle> {
        let throttle = Arc::new(LoginThrottle::new(
            Arc::new(MemoryAttemptStore::default()),
            clock,
        ));
        for _ in 0..5 {
            throttle.record_failure("1.2.3.4");
        }
        throttle
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_exits_once_lockout_clears() {
        let clock = ManualClock::new();
        let throttle = locked_throttle(clock.clone());
        let countdowns = Arc::new(LockoutCountdowns::new());

        countdowns.start(Arc::clone(&throttle), "1.2.3.4".to_string());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(countdowns.active_count(), 1);

        // Let the lockout expire; the next tick clears it and the task ends.
        clock.advance_secs(31);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(countdowns.active_count(), 0);
        assert_eq!(throttle.check_gate("1.2.3.4"), Gate::Allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_countdown() {
        let clock = ManualClock::new();
        let throttle = locked_throttle(clock);
        let countdowns = Arc::new(LockoutCountdowns::new());

        countdowns.start(Arc::clone(&throttle), "1.2.3.4".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(countdowns.active_count(), 1);

        countdowns.cancel("1.2.3.4");
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(countdowns.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_for_same_key_is_ignored() {
        let clock = ManualClock::new();
        let throttle = locked_throttle(clock);
        let countdowns = Arc::new(LockoutCountdowns::new());

        countdowns.start(Arc::clone(&throttle), "1.2.3.4".to_string());
        countdowns.start(Arc::clone(&throttle), "1.2.3.4".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(countdowns.active_count(), 1);

        countdowns.shutdown();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(countdowns.active_count(), 0);
    }
}
