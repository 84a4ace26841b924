//! WebSocket log-tailing connection.
//!
//! Default implementation of the [`LogTailer`] port. Opening the tail
//! spawns a pump task that forwards decoded log envelopes into the event
//! channel and transport failures into the error channel. Closing the
//! tailer flips a watch flag the pump selects on; the pump then drops both
//! senders, which is what actually closes the tail channels.
//!
//! # Connection Lifecycle
//!
//! 1. **Connection**: `tail()` builds an authenticated upgrade request and
//!    the pump establishes the WebSocket connection
//! 2. **Message loop**: text frames decode into log messages; ping frames
//!    are answered with pong; close frames end the loop
//! 3. **Termination**: `close()`, a server close frame, or a transport
//!    error ends the pump, closing both channels

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{AppGuid, LogMessage, MessageKind};
use crate::error::LogStreamError;
use crate::port::{LogStreams, LogTailer};

const EVENT_CHANNEL_BUFFER: usize = 64;
const ERROR_CHANNEL_BUFFER: usize = 16;

/// One decoded log frame as the streaming endpoint emits it.
#[derive(Debug, Deserialize)]
struct LogEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    message_type: MessageKind,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    source_type: String,
    #[serde(default)]
    source_instance: String,
}

impl LogEnvelope {
    fn into_message(self) -> LogMessage {
        LogMessage {
            message: self.message,
            kind: self.message_type,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            source_type: self.source_type,
            source_instance: self.source_instance,
        }
    }
}

/// WebSocket-backed log tailer for one orchestration run.
pub struct WebSocketLogTailer {
    endpoint: String,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl WebSocketLogTailer {
    /// Create a tailer against the given streaming endpoint
    /// (e.g., `wss://logs.run.skylift.io`).
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            shutdown: Mutex::new(None),
        }
    }

    /// Create a tailer from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.network.log_stream_url.clone())
    }
}

#[async_trait]
impl LogTailer for WebSocketLogTailer {
    async fn tail(&self, app_guid: &AppGuid, token: &str) -> LogStreams {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let (error_tx, error_rx) = mpsc::channel(ERROR_CHANNEL_BUFFER);
        let (stop_tx, stop_rx) = watch::channel(false);

        *self.shutdown.lock() = Some(stop_tx);

        let url = format!("{}/apps/{}/stream", self.endpoint, app_guid);
        tokio::spawn(pump(url, token.to_string(), event_tx, error_tx, stop_rx));

        (event_rx, error_rx)
    }

    async fn close(&self) -> Result<(), LogStreamError> {
        if let Some(stop) = self.shutdown.lock().take() {
            let _ = stop.send(true);
        }
        Ok(())
    }
}

/// Connection and message loop of one tail.
///
/// Both channel senders drop when this task returns; that drop is what
/// closes the tail channels, on every exit path.
async fn pump(
    url: String,
    token: String,
    event_tx: mpsc::Sender<LogMessage>,
    error_tx: mpsc::Sender<LogStreamError>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut request = match url.as_str().into_client_request() {
        Ok(request) => request,
        Err(err) => {
            let _ = error_tx.send(err.into()).await;
            return;
        }
    };
    match HeaderValue::from_str(&format!("bearer {token}")) {
        Ok(value) => {
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Err(err) => {
            let _ = error_tx
                .send(LogStreamError::Connection(err.to_string()))
                .await;
            return;
        }
    }

    let (mut ws, response) = match connect_async(request).await {
        Ok(pair) => pair,
        Err(err) => {
            let _ = error_tx.send(err.into()).await;
            return;
        }
    };
    info!(%url, status = %response.status(), "Log stream connected");

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    debug!(%url, "Closing log stream");
                    let _ = ws.close(None).await;
                    break;
                }
            }
            frame = ws.next() => match frame {
                None => break,
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<LogEnvelope>(&text) {
                        Ok(envelope) => {
                            if event_tx.send(envelope.into_message()).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            if error_tx.send(LogStreamError::Decode(err)).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    let _ = ws.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) => {
                    debug!(%url, "Log stream closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(%url, error = %err, "Log stream transport failure");
                    let _ = error_tx.send(err.into()).await;
                    break;
                }
            }
        }
    }
}
