//! Orchestration layer: the start orchestrator, its polling state machine,
//! and the single-shot query operations.
//!
//! - [`start`] — the core: trigger, two poll phases, log drains, shutdown.
//! - [`poll`] — pure phase decision logic, no I/O and no clock.
//! - [`query`] — fetch-by-guid, fetch-by-name-and-space, fetch-by-route.
//! - [`health_check`] — the conditional health-check-type update.

pub mod health_check;
pub mod poll;
pub mod query;
pub mod start;

pub use health_check::set_application_health_check_type_by_name_and_space;
pub use query::{
    get_application, get_application_by_name_and_space, get_route_applications, ActionResult,
};
pub use start::{start_application, StartStreams};
