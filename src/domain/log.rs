//! Log events delivered by the log-tailing connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which of the application's output streams a log line came from.
///
/// Unrecognized wire values are treated as stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Err,
    #[default]
    #[serde(other)]
    Out,
}

/// One log event, forwarded verbatim from the log-tailing connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    /// The log line itself.
    pub message: String,
    /// Stdout or stderr.
    pub kind: MessageKind,
    /// When the platform recorded the line.
    pub timestamp: DateTime<Utc>,
    /// Emitting component, e.g. "APP" or "STG".
    pub source_type: String,
    /// Index of the emitting instance, as reported by the platform.
    pub source_instance: String,
}

impl LogMessage {
    /// Check if the message came from the staging component.
    #[must_use]
    pub fn staging(&self) -> bool {
        self.source_type == "STG"
    }
}
