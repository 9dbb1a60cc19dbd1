//! # Fibonacci Backoff
//!
//! Retry pacing for watch streams. The watcher keeps retrying after an API
//! error; this backoff spaces the retries out so a flapping API server is
//! not hammered.
//!
//! Sequence with the defaults used by the Sources: 1s, 1s, 2s, 3s, 5s, 8s,
//! 13s, 21s, 34s, 55s, 60s (max). Reset after the next successful event.

use kube_runtime::utils::Backoff;
use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each backoff is the sum of the previous two, capped at `max_seconds`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Minimum backoff value in seconds (for reset)
    min_seconds: u64,
    /// Previous backoff value in seconds
    prev_seconds: u64,
    /// Current backoff value in seconds
    current_seconds: u64,
    /// Maximum backoff value in seconds
    max_seconds: u64,
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff with specified minimum and maximum values in seconds
    ///
    /// # Arguments
    ///
    /// * `min_seconds` - First two values of the sequence (typically 1)
    /// * `max_seconds` - Cap for the sequence (typically 60)
    #[must_use]
    pub fn new(min_seconds: u64, max_seconds: u64) -> Self {
        Self {
            min_seconds,
            prev_seconds: 0,
            current_seconds: min_seconds,
            max_seconds,
        }
    }

    /// Get the next backoff duration in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_seconds;

        let next_seconds = self.prev_seconds + self.current_seconds;
        self.prev_seconds = self.current_seconds;
        self.current_seconds = std::cmp::min(next_seconds, self.max_seconds);

        result_seconds
    }
}

impl Iterator for FibonacciBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(Duration::from_secs(self.next_backoff_seconds()))
    }
}

impl Backoff for FibonacciBackoff {
    /// Reset the backoff to the initial state
    fn reset(&mut self) {
        self.prev_seconds = 0;
        self.current_seconds = self.min_seconds;
    }
}
