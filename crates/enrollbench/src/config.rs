//! Load parameters, overridable through the environment.

use std::time::Duration;

/// Tunables for one benchmark run.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Seat limit applied to newly created courses.
    pub capacity: usize,
    /// Delay before a course's registration window is closed.
    pub close_after: Duration,
    /// Settlement watcher poll interval. Settlement is not latency
    /// critical; a shorter interval only trades lock traffic for faster
    /// detection.
    pub settle_poll: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            capacity: std::env::var("ENROLLBENCH_COURSE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            close_after: Duration::from_secs(
                std::env::var("ENROLLBENCH_CLOSE_AFTER_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            settle_poll: Duration::from_millis(
                std::env::var("ENROLLBENCH_SETTLE_POLL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            ),
        }
    }
}
