//! Core logic: dashboard traffic analytics and login throttling.
//!
//! - [`analytics`] — time-window filtering and derived visit statistics
//! - [`throttle`] — failed-attempt counter with temporary lockout

pub mod analytics;
pub mod throttle;

pub use analytics::{TrafficReport, TrafficWindow};
pub use throttle::{AttemptStore, Clock, Gate, LoginThrottle, MemoryAttemptStore, SystemClock};
