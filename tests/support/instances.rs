//! Instance snapshot builders for integration tests.

use skylift::domain::{ApplicationInstance, InstanceSnapshot, InstanceState};

/// Build a snapshot from instance states, indexed in order.
pub fn snapshot(states: &[InstanceState]) -> InstanceSnapshot {
    states
        .iter()
        .enumerate()
        .map(|(index, state)| (index as u32, ApplicationInstance::new(*state)))
        .collect()
}
