//! Platform-agnostic domain types: applications, instances, log events.
//!
//! Everything here is a plain value type with pure computation only; all
//! I/O lives behind the [`port`](crate::port) traits and in the
//! [`adapter`](crate::adapter) implementations.

pub mod application;
pub mod id;
pub mod instance;
pub mod log;
pub mod warnings;

pub use application::{Application, ApplicationPatch, ApplicationState, PackageState};
pub use id::{AppGuid, RouteGuid, SpaceGuid};
pub use instance::{ApplicationInstance, InstanceSnapshot, InstanceState};
pub use log::{LogMessage, MessageKind};
pub use warnings::Warnings;
