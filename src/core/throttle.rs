//! Login attempt throttling: failed-attempt counter with temporary lockout.
//!
//! State machine per client key: `Open` while attempts stay below the
//! threshold; the fifth consecutive failure moves the key to `Locked` for 30
//! seconds, during which the gate rejects attempts before any credentials
//! are checked. A success, or the lockout running out, returns the key to
//! `Open` with the counter at zero.
//!
//! The attempt state sits behind [`AttemptStore`] and time behind [`Clock`]
//! so the machine can run against an in-memory map in production and a
//! manual clock in tests. A client that changes identity resets its counter;
//! this is a deterrent against casual retry loops, not a security boundary.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config;

/// Persisted throttle state for one client key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    /// Consecutive failed attempts since the last reset.
    pub attempt_count: u32,
    /// Instant after which attempts are allowed again; absent when open.
    pub lockout_expiry: Option<DateTime<Utc>>,
}

/// Storage seam for throttle state, keyed by client identity.
pub trait AttemptStore: Send + Sync {
    fn load(&self, key: &str) -> Option<AttemptState>;
    fn save(&self, key: &str, state: AttemptState);
    fn clear(&self, key: &str);
}

/// Wall-clock seam so lockout timing can be driven in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// In-memory [`AttemptStore`] used by the running service.
#[derive(Default)]
pub struct MemoryAttemptStore {
    states: DashMap<String, AttemptState>,
}

impl AttemptStore for MemoryAttemptStore {
    fn load(&self, key: &str) -> Option<AttemptState> {
        self.states.get(key).map(|s| s.clone())
    }

    fn save(&self, key: &str, state: AttemptState) {
        self.states.insert(key.to_string(), state);
    }

    fn clear(&self, key: &str) {
        self.states.remove(key);
    }
}

/// Result of the pre-flight gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    Denied { seconds_remaining: u64 },
}

/// Outcome of recording one failed attempt, for user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Attempt count after this failure.
    pub attempt_count: u32,
    /// Lockout duration in seconds when this failure triggered one.
    pub locked_for_secs: Option<u64>,
}

/// The throttle itself; cheap to clone behind `Arc`s.
pub struct LoginThrottle {
    store: Arc<dyn AttemptStore>,
    clock: Arc<dyn Clock>,
}

impl LoginThrottle {
    pub fn new(store: Arc<dyn AttemptStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Pre-flight check before credentials are submitted. Pure: no state is
    /// touched, an expired lockout is simply reported as open.
    pub fn check_gate(&self, key: &str) -> Gate {
        let now = self.clock.now();
        match self.store.load(key).and_then(|s| s.lockout_expiry) {
            Some(expiry) if now < expiry => Gate::Denied {
                seconds_remaining: seconds_remaining(expiry, now),
            },
            _ => Gate::Allowed,
        }
    }

    /// Record one failed attempt. An expired lockout is cleared first, so
    /// counting restarts at 1. Reaching the threshold sets the lockout and
    /// reports its duration.
    pub fn record_failure(&self, key: &str) -> FailureOutcome {
        let now = self.clock.now();
        let mut state = self.store.load(key).unwrap_or_default();

        if let Some(expiry) = state.lockout_expiry {
            if now >= expiry {
                state = AttemptState::default();
            }
        }

        state.attempt_count += 1;
        let locked_for_secs = if state.attempt_count >= config::MAX_LOGIN_ATTEMPTS {
            state.lockout_expiry = Some(now + Duration::seconds(config::LOCKOUT_DURATION_SECS));
            Some(config::LOCKOUT_DURATION_SECS as u64)
        } else {
            None
        };

        let outcome = FailureOutcome {
            attempt_count: state.attempt_count,
            locked_for_secs,
        };
        self.store.save(key, state);
        outcome
    }

    /// Successful authentication clears the state entirely, whatever the count.
    pub fn record_success(&self, key: &str) {
        self.store.clear(key);
    }

    /// One countdown step. Returns the whole seconds left (rounded up) while
    /// the lockout runs; at zero the state is cleared and `None` is returned,
    /// which also tells the caller to stop ticking.
    pub fn tick(&self, key: &str) -> Option<u64> {
        let expiry = self.store.load(key)?.lockout_expiry?;
        let now = self.clock.now();
        if now >= expiry {
            self.store.clear(key);
            return None;
        }
        Some(seconds_remaining(expiry, now))
    }
}

/// Whole seconds until `expiry`, rounded up.
fn seconds_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (expiry - now).num_milliseconds().max(0);
    (ms as u64).div_ceil(1000)
}
