//! Skylift - Deploy-lifecycle orchestration for a PaaS client.
//!
//! This crate drives an application through a remote platform's deploy
//! lifecycle (stage, then start instances) while concurrently tailing the
//! application's log stream, merging the resulting warnings, errors, log
//! lines and completion signals into a small set of consumer-facing
//! channels.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - **`domain`** - Value types and pure predicates (applications,
//!   instances, log events)
//! - **`port`** - Trait contracts for the control-plane client, the
//!   log-tailing connection, and the start policy
//! - **`runtime`** - The start orchestrator, its polling state machine,
//!   and the single-shot query operations
//! - **`adapter`** - Default port implementations: a reqwest control-plane
//!   client and a WebSocket log tailer
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Platform-agnostic value types
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait contracts for external collaborators
//! - [`runtime`] - Orchestration and queries
//! - [`adapter`] - Default collaborator implementations
//!
//! # Features
//!
//! - `testkit` - Scripted collaborator fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use skylift::adapter::{HttpControlPlaneClient, WebSocketLogTailer};
//! use skylift::config::Config;
//! use skylift::runtime::{get_application, start_application};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(Config::load("config.toml")?);
//! let client = Arc::new(HttpControlPlaneClient::from_config(&config));
//! let tailer = Arc::new(WebSocketLogTailer::from_config(&config));
//!
//! let (_, app) = get_application(client.as_ref(), &"some-app-guid".into()).await;
//! let mut streams = start_application(client, &app?, tailer, config);
//!
//! while let Some(warning) = streams.warnings.recv().await {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod runtime;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
