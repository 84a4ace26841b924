//! Channel-backed [`LogTailer`] test double.
//!
//! Events and transport errors are pushed on demand from the test body;
//! `close()` drops the internal senders, which closes both tail channels
//! exactly the way the contract requires - including when nothing was ever
//! emitted.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::{AppGuid, LogMessage};
use crate::error::LogStreamError;
use crate::port::{LogStreams, LogTailer};

const CHANNEL_BUFFER: usize = 32;

/// Deterministic log tailer controlled from the test body.
#[derive(Default)]
pub struct ChannelLogTailer {
    senders: Mutex<Option<(mpsc::Sender<LogMessage>, mpsc::Sender<LogStreamError>)>>,
    tail_calls: AtomicU32,
    close_calls: AtomicU32,
    tail_requests: Mutex<Vec<(AppGuid, String)>>,
}

impl ChannelLogTailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a log event into an open tail. Dropped silently when the
    /// tail is not open, mirroring a quiet connection.
    pub async fn emit(&self, message: LogMessage) {
        let sender = self.senders.lock().as_ref().map(|(events, _)| events.clone());
        if let Some(sender) = sender {
            let _ = sender.send(message).await;
        }
    }

    /// Deliver a transport error into an open tail.
    pub async fn emit_error(&self, err: LogStreamError) {
        let sender = self.senders.lock().as_ref().map(|(_, errors)| errors.clone());
        if let Some(sender) = sender {
            let _ = sender.send(err).await;
        }
    }

    /// How many times `tail` was called.
    pub fn tail_calls(&self) -> u32 {
        self.tail_calls.load(Ordering::SeqCst)
    }

    /// How many times `close` was called.
    pub fn close_calls(&self) -> u32 {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// The (app guid, token) pairs passed to `tail`, in call order.
    pub fn tail_requests(&self) -> Vec<(AppGuid, String)> {
        self.tail_requests.lock().clone()
    }
}

#[async_trait]
impl LogTailer for ChannelLogTailer {
    async fn tail(&self, app_guid: &AppGuid, token: &str) -> LogStreams {
        self.tail_calls.fetch_add(1, Ordering::SeqCst);
        self.tail_requests
            .lock()
            .push((app_guid.clone(), token.to_string()));

        let (event_tx, event_rx) = mpsc::channel(CHANNEL_BUFFER);
        let (error_tx, error_rx) = mpsc::channel(CHANNEL_BUFFER);
        *self.senders.lock() = Some((event_tx, error_tx));

        (event_rx, error_rx)
    }

    async fn close(&self) -> Result<(), LogStreamError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        // Dropping the senders closes both tail channels.
        *self.senders.lock() = None;
        Ok(())
    }
}
