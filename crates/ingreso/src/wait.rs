//! Bounded waits.
//!
//! Every interaction with a named element first waits for that element to
//! reach a readiness condition within a bounded timeout. Two distinct
//! policies exist and must not be unified:
//!
//! - [`INTERACT_TIMEOUT_MS`]: the element must exist for the test to be
//!   meaningful; expiry propagates as [`IngresoError::Timeout`].
//! - [`PRESENCE_TIMEOUT_MS`]: the element may legitimately be absent; the
//!   caller probes quickly and branches on a boolean.

use crate::result::{IngresoError, IngresoResult};
use std::time::{Duration, Instant};

/// Timeout for interactions that require the element to exist (10 seconds)
pub const INTERACT_TIMEOUT_MS: u64 = 10_000;

/// Timeout for probing elements that may be absent (5 seconds)
pub const PRESENCE_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: INTERACT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with the interaction policy defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the presence-probe policy
    #[must_use]
    pub const fn presence() -> Self {
        Self {
            timeout_ms: PRESENCE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// URL pattern for observing navigation outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
}

impl UrlPattern {
    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern),
            Self::Contains(pattern) => url.contains(pattern),
        }
    }

    /// Human-readable description for timeout errors
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(p) => format!("URL equal to '{p}'"),
            Self::Prefix(p) => format!("URL starting with '{p}'"),
            Self::Contains(p) => format!("URL containing '{p}'"),
        }
    }
}

/// Poll a predicate until it holds or the timeout elapses.
///
/// Blocking variant used by the mock transport; the CDP transport polls
/// asynchronously inside `Page`.
pub fn wait_until<F>(predicate: F, options: &WaitOptions, condition: &str) -> IngresoResult<()>
where
    F: Fn() -> bool,
{
    let start = Instant::now();

    loop {
        if predicate() {
            return Ok(());
        }

        if start.elapsed() >= options.timeout() {
            return Err(IngresoError::Timeout {
                condition: condition.to_string(),
                ms: options.timeout_ms,
            });
        }

        std::thread::sleep(options.poll_interval());
    }
}
