//! Application domain types.
//!
//! - [`Application`] - One deployed application as reported by the control plane
//! - [`ApplicationState`] / [`PackageState`] - Lifecycle and staging states
//! - [`ApplicationPatch`] - Sparse update sent back to the control plane

use serde::{Deserialize, Serialize};

use super::id::{AppGuid, SpaceGuid};

/// Health-check type whose endpoint field is meaningful.
const HTTP_HEALTH_CHECK: &str = "http";

/// Desired lifecycle state of an application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationState {
    Started,
    #[default]
    Stopped,
}

/// Staging state of an application's current package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageState {
    #[default]
    Pending,
    Staged,
    Failed,
}

/// One application as observed on the control plane.
///
/// A plain value type: the orchestration layer reads and republishes copies
/// of it and never mutates a caller's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    /// Opaque application identifier, immutable once created.
    pub guid: AppGuid,
    /// Human-readable application name.
    pub name: String,
    /// Desired instance count.
    pub instances: i64,
    /// Space the application lives in.
    pub space_guid: SpaceGuid,
    /// Desired lifecycle state.
    pub state: ApplicationState,
    /// Staging state of the current package.
    pub package_state: PackageState,
    /// Populated only when `package_state` is [`PackageState::Failed`].
    pub staging_failed_reason: String,
    /// Operator-pinned buildpack, empty when unset.
    pub buildpack: String,
    /// Buildpack the platform detected during staging, empty when unset.
    pub detected_buildpack: String,
    /// Health-check type, e.g. "port", "process", or "http".
    pub health_check_type: String,
    /// Endpoint probed when the health-check type is "http".
    pub health_check_http_endpoint: String,
}

impl Application {
    /// The buildpack in effect: the pinned one when set, otherwise the
    /// detected one, otherwise empty.
    #[must_use]
    pub fn calculated_buildpack(&self) -> &str {
        if !self.buildpack.is_empty() {
            &self.buildpack
        } else {
            &self.detected_buildpack
        }
    }

    /// The health-check endpoint in effect: only meaningful for the "http"
    /// health-check type, empty for every other type even when an endpoint
    /// value is present.
    #[must_use]
    pub fn calculated_health_check_endpoint(&self) -> &str {
        if self.health_check_type == HTTP_HEALTH_CHECK {
            &self.health_check_http_endpoint
        } else {
            ""
        }
    }

    /// Check if the application's package finished staging.
    #[must_use]
    pub fn staging_completed(&self) -> bool {
        self.package_state == PackageState::Staged
    }

    /// Check if staging the application's package failed.
    #[must_use]
    pub fn staging_failed(&self) -> bool {
        self.package_state == PackageState::Failed
    }

    /// Check if the application's desired state is started.
    #[must_use]
    pub fn started(&self) -> bool {
        self.state == ApplicationState::Started
    }
}

/// A sparse application update.
///
/// Only the populated fields are sent to the control plane; everything else
/// is left untouched on the remote record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub guid: AppGuid,
    pub state: Option<ApplicationState>,
    pub health_check_type: Option<String>,
    pub health_check_http_endpoint: Option<String>,
}

impl ApplicationPatch {
    /// Create an empty patch for the given application.
    #[must_use]
    pub fn new(guid: AppGuid) -> Self {
        Self {
            guid,
            ..Self::default()
        }
    }

    /// Request a lifecycle state change.
    #[must_use]
    pub fn with_state(mut self, state: ApplicationState) -> Self {
        self.state = Some(state);
        self
    }

    /// Request a health-check type change.
    #[must_use]
    pub fn with_health_check_type(mut self, health_check_type: impl Into<String>) -> Self {
        self.health_check_type = Some(health_check_type.into());
        self
    }

    /// Request a health-check endpoint change.
    #[must_use]
    pub fn with_health_check_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.health_check_http_endpoint = Some(endpoint.into());
        self
    }
}
