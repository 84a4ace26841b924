//! Polling state machine decision logic.
//!
//! Pure functions only: given a snapshot of remote state (and, for the
//! expiry check, elapsed time), decide what the poll driver should do next.
//! The driver in [`start`](super::start) owns the clock, the fetches, and
//! the sleeps, which keeps the timing policy unit-testable without real
//! clocks.

use std::time::Duration;

use crate::domain::{Application, InstanceSnapshot};

/// What the staging phase should do after observing an application snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagingVerdict {
    /// The package is still pending; poll again after one interval.
    InProgress,
    /// The package is staged; advance to the startup phase.
    Completed,
    /// Staging failed; terminate the run with the platform's reason.
    Failed { reason: String },
}

/// Decide the staging phase's next step from one application snapshot.
#[must_use]
pub fn staging_verdict(app: &Application) -> StagingVerdict {
    if app.staging_completed() {
        StagingVerdict::Completed
    } else if app.staging_failed() {
        StagingVerdict::Failed {
            reason: app.staging_failed_reason.clone(),
        }
    } else {
        StagingVerdict::InProgress
    }
}

/// What the startup phase should do after observing an instance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupVerdict {
    /// At least one instance is not yet running; poll again.
    InProgress,
    /// Every instance in the snapshot is running.
    AllRunning,
    /// An instance crashed; terminal for the whole run.
    Crashed,
    /// An instance is flapping; terminal for the whole run.
    Flapping,
}

/// Decide the startup phase's next step from one instance snapshot.
///
/// A crashed instance wins over a flapping one when both appear. An empty
/// snapshot counts as all-running, which keeps zero-instance applications
/// startable.
#[must_use]
pub fn startup_verdict(instances: &InstanceSnapshot) -> StartupVerdict {
    if instances.values().any(|instance| instance.crashed()) {
        StartupVerdict::Crashed
    } else if instances.values().any(|instance| instance.flapping()) {
        StartupVerdict::Flapping
    } else if instances.values().all(|instance| instance.running()) {
        StartupVerdict::AllRunning
    } else {
        StartupVerdict::InProgress
    }
}

/// Check whether a phase's time budget is spent.
///
/// A zero timeout is already expired, so the phase produces its timeout
/// error before performing any fetch.
#[must_use]
pub fn phase_expired(elapsed: Duration, timeout: Duration) -> bool {
    elapsed >= timeout
}
