//! Fixed-value [`StartPolicy`] test double with read counters.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::port::StartPolicy;

/// Policy with fixed values, recording how often each value was read.
///
/// The read counters let tests pin down the contract that each poll phase
/// reads its timeout exactly once at phase entry.
pub struct StaticPolicy {
    staging_timeout: Duration,
    startup_timeout: Duration,
    polling_interval: Duration,
    access_token: String,
    staging_timeout_reads: AtomicU32,
    startup_timeout_reads: AtomicU32,
    polling_interval_reads: AtomicU32,
}

impl StaticPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            staging_timeout: Duration::from_secs(60),
            startup_timeout: Duration::from_secs(60),
            polling_interval: Duration::from_secs(10),
            access_token: "some-access-token".into(),
            staging_timeout_reads: AtomicU32::new(0),
            startup_timeout_reads: AtomicU32::new(0),
            polling_interval_reads: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_staging_timeout(mut self, timeout: Duration) -> Self {
        self.staging_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    /// How many times `staging_timeout` was read.
    pub fn staging_timeout_reads(&self) -> u32 {
        self.staging_timeout_reads.load(Ordering::SeqCst)
    }

    /// How many times `startup_timeout` was read.
    pub fn startup_timeout_reads(&self) -> u32 {
        self.startup_timeout_reads.load(Ordering::SeqCst)
    }

    /// How many times `polling_interval` was read.
    pub fn polling_interval_reads(&self) -> u32 {
        self.polling_interval_reads.load(Ordering::SeqCst)
    }
}

impl Default for StaticPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl StartPolicy for StaticPolicy {
    fn staging_timeout(&self) -> Duration {
        self.staging_timeout_reads.fetch_add(1, Ordering::SeqCst);
        self.staging_timeout
    }

    fn startup_timeout(&self) -> Duration {
        self.startup_timeout_reads.fetch_add(1, Ordering::SeqCst);
        self.startup_timeout
    }

    fn polling_interval(&self) -> Duration {
        self.polling_interval_reads.fetch_add(1, Ordering::SeqCst);
        self.polling_interval
    }

    fn access_token(&self) -> String {
        self.access_token.clone()
    }
}
