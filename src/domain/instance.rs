//! Application instance domain types.
//!
//! An instance is one running replica of an application. Instance snapshots
//! are produced fresh on every poll; no instance identity persists across
//! polls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Observed state of a single application instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceState {
    Starting,
    Running,
    Crashed,
    /// Repeatedly crashing and restarting; terminal rather than transient.
    Flapping,
    Down,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One running replica of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInstance {
    pub state: InstanceState,
}

impl ApplicationInstance {
    /// Create an instance in the given state.
    #[must_use]
    pub const fn new(state: InstanceState) -> Self {
        Self { state }
    }

    /// Check if the instance is running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.state == InstanceState::Running
    }

    /// Check if the instance crashed.
    #[must_use]
    pub fn crashed(&self) -> bool {
        self.state == InstanceState::Crashed
    }

    /// Check if the instance is flapping.
    #[must_use]
    pub fn flapping(&self) -> bool {
        self.state == InstanceState::Flapping
    }
}

/// One poll's view of every instance, keyed by instance index.
pub type InstanceSnapshot = BTreeMap<u32, ApplicationInstance>;
