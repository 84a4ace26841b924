//! Wire types for the control-plane REST API.
//!
//! The v2-style API wraps every record in a `metadata`/`entity` envelope
//! and reports instance snapshots as an object keyed by instance index.
//! Mapping into domain types happens here so nothing above the adapter
//! ever sees a wire shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    AppGuid, Application, ApplicationInstance, ApplicationPatch, ApplicationState,
    InstanceSnapshot, InstanceState, PackageState, SpaceGuid,
};

/// The `metadata` half of a v2 resource envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub guid: String,
}

/// The `entity` half of an application resource.
///
/// The platform reports unset string fields as `null`, hence the options.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationEntity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instances: i64,
    #[serde(default)]
    pub space_guid: String,
    #[serde(default)]
    pub state: ApplicationState,
    #[serde(default)]
    pub package_state: PackageState,
    #[serde(default)]
    pub staging_failed_reason: Option<String>,
    #[serde(default)]
    pub buildpack: Option<String>,
    #[serde(default)]
    pub detected_buildpack: Option<String>,
    #[serde(default)]
    pub health_check_type: String,
    #[serde(default)]
    pub health_check_http_endpoint: Option<String>,
}

/// One application record as returned by the control plane.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationResource {
    pub metadata: Metadata,
    pub entity: ApplicationEntity,
}

impl ApplicationResource {
    /// Map the wire envelope into the domain value.
    #[must_use]
    pub fn into_application(self) -> Application {
        Application {
            guid: AppGuid::new(self.metadata.guid),
            name: self.entity.name,
            instances: self.entity.instances,
            space_guid: SpaceGuid::new(self.entity.space_guid),
            state: self.entity.state,
            package_state: self.entity.package_state,
            staging_failed_reason: self.entity.staging_failed_reason.unwrap_or_default(),
            buildpack: self.entity.buildpack.unwrap_or_default(),
            detected_buildpack: self.entity.detected_buildpack.unwrap_or_default(),
            health_check_type: self.entity.health_check_type,
            health_check_http_endpoint: self
                .entity
                .health_check_http_endpoint
                .unwrap_or_default(),
        }
    }
}

/// A page of application resources.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationsPage {
    #[serde(default)]
    pub resources: Vec<ApplicationResource>,
}

impl ApplicationsPage {
    /// Map every resource on the page into domain values.
    #[must_use]
    pub fn into_applications(self) -> Vec<Application> {
        self.resources
            .into_iter()
            .map(ApplicationResource::into_application)
            .collect()
    }
}

/// One instance record inside an instance snapshot response.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceResource {
    #[serde(default)]
    pub state: InstanceState,
}

/// Map a raw instances response (object keyed by instance index) into a
/// domain snapshot. Indices the platform reports in a non-numeric form are
/// dropped with a warning.
#[must_use]
pub fn into_instance_snapshot(raw: HashMap<String, InstanceResource>) -> InstanceSnapshot {
    let mut snapshot = InstanceSnapshot::new();
    for (index, resource) in raw {
        match index.parse::<u32>() {
            Ok(index) => {
                snapshot.insert(index, ApplicationInstance::new(resource.state));
            }
            Err(_) => warn!(index = %index, "Dropping instance with non-numeric index"),
        }
    }
    snapshot
}

/// Request body for a sparse application update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateApplicationBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ApplicationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_http_endpoint: Option<String>,
}

impl From<&ApplicationPatch> for UpdateApplicationBody {
    fn from(patch: &ApplicationPatch) -> Self {
        Self {
            state: patch.state,
            health_check_type: patch.health_check_type.clone(),
            health_check_http_endpoint: patch.health_check_http_endpoint.clone(),
        }
    }
}
