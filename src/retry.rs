//! Bounded or unbounded retry of a fallible step.
//!
//! Used for camera setup and for command registration. A `max_tries` of zero
//! means "keep trying until it works".

use std::thread;
use std::time::Duration;

use tracing::warn;

/// How many times to attempt a step and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts; zero retries forever.
    pub max_tries: u32,
    /// Pause between failed attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    pub fn new(max_tries: u32, delay: Duration) -> Self {
        Self { max_tries, delay }
    }

    /// A policy that retries forever.
    pub fn unbounded(delay: Duration) -> Self {
        Self::new(0, delay)
    }

    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Returns true if there is no attempt limit.
    pub fn is_unbounded(&self) -> bool {
        self.max_tries == 0
    }

    /// Runs `step` until it succeeds or the attempts are used up.
    ///
    /// `step` receives the 1-based attempt number. The last error is returned
    /// when every attempt failed.
    pub fn run<T, E, F>(&self, label: &str, mut step: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            match step(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if self.is_unbounded() || attempt < self.max_tries => {
                    warn!("{label}: attempt {attempt} failed ({e}), trying again");
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}
