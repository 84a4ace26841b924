//! Default implementations of the outbound ports.
//!
//! - [`http`] — reqwest-based control-plane client
//! - [`stream`] — WebSocket log tailer

pub mod http;
pub mod stream;

pub use http::HttpControlPlaneClient;
pub use stream::WebSocketLogTailer;
