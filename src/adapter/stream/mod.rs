//! Log-streaming WebSocket adapter.

pub mod tailer;

pub use tailer::WebSocketLogTailer;
