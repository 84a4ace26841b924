//! Log-tailing port.
//!
//! A log tailer is a long-lived connection that streams an application's
//! live output. Opening the tail yields a pair of one-way channels; closing
//! the tailer is the sole teardown action and must cause both channels to
//! close so consumers can drain to completion.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{AppGuid, LogMessage};
use crate::error::LogStreamError;

/// The channel pair produced by [`LogTailer::tail`]: log events and
/// transport errors.
pub type LogStreams = (
    mpsc::Receiver<LogMessage>,
    mpsc::Receiver<LogStreamError>,
);

/// Long-lived log-tailing connection for one application.
///
/// A tailer instance is exclusively owned by one orchestration run for that
/// run's duration; callers must not reuse it concurrently for another run.
#[async_trait]
pub trait LogTailer: Send + Sync {
    /// Open the tailing connection for the given application.
    ///
    /// Log events and transport errors are delivered on the returned
    /// channels until [`close`](LogTailer::close) is called or the remote
    /// side ends the stream.
    async fn tail(&self, app_guid: &AppGuid, token: &str) -> LogStreams;

    /// Terminate the connection.
    ///
    /// Postcondition: both channels returned by [`tail`](LogTailer::tail)
    /// eventually close, even when no event was ever delivered. Consumers
    /// must wait on the channel closures themselves rather than assume the
    /// close is synchronous. Called at most once per run.
    async fn close(&self) -> Result<(), LogStreamError>;
}
