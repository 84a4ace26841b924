//! Start-policy port.
//!
//! Supplies the timeout and pacing values that bound a start orchestration,
//! plus the access credential handed to the log tailer. Treated as an
//! opaque read-only source: each poll phase reads its timeout exactly once
//! at phase entry, so implementations racing configuration changes must not
//! expect mid-phase re-reads.

use std::time::Duration;

/// Timeout, pacing, and credential source for a start orchestration.
pub trait StartPolicy: Send + Sync {
    /// How long the staging phase may run. Zero means already expired.
    fn staging_timeout(&self) -> Duration;

    /// How long the instance-startup phase may run. Zero means already
    /// expired.
    fn startup_timeout(&self) -> Duration;

    /// Pause between consecutive polls within a phase.
    fn polling_interval(&self) -> Duration;

    /// Access credential handed to the log-tailing connection.
    fn access_token(&self) -> String;
}
