//! Control-plane client port.
//!
//! This module defines the trait for talking to the platform's control-plane
//! API. It is the primary integration point for application queries and
//! mutations; the default implementation lives in
//! [`adapter::http`](crate::adapter::http).

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    AppGuid, Application, ApplicationPatch, InstanceSnapshot, RouteGuid, Warnings,
};
use crate::error::ClientError;

/// Outcome of one control-plane round trip.
///
/// Warnings ride alongside both success and failure so callers can surface
/// them before acting on the result; the platform attaches advisory text to
/// nearly every response, including failed ones.
pub type CallResult<T> = (Warnings, Result<T, ClientError>);

/// Field an equality filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Name,
    SpaceGuid,
    OrganizationGuid,
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKey::Name => "name",
            FilterKey::SpaceGuid => "space_guid",
            FilterKey::OrganizationGuid => "organization_guid",
        };
        write!(f, "{name}")
    }
}

/// One equality filter on a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub key: FilterKey,
    pub value: String,
}

impl Filter {
    /// Create an equality filter.
    pub fn equal(key: FilterKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Client for the platform's control-plane API.
///
/// Every method returns the warnings attached to the response together with
/// the result proper; a [`ClientError::ResourceNotFound`] outcome is
/// distinguishable from every other error so the action layer can shape
/// not-found conditions.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Fetch one application by GUID.
    async fn get_application(&self, guid: &AppGuid) -> CallResult<Application>;

    /// Fetch applications matching every given filter.
    async fn get_applications(&self, filters: &[Filter]) -> CallResult<Vec<Application>>;

    /// Apply a sparse update to an application and return the updated record.
    async fn update_application(&self, patch: ApplicationPatch) -> CallResult<Application>;

    /// Fetch the current instance snapshot of an application.
    async fn get_application_instances(&self, guid: &AppGuid) -> CallResult<InstanceSnapshot>;

    /// Fetch the applications bound to a route, optionally narrowed by
    /// additional filters.
    async fn get_route_applications(
        &self,
        route_guid: &RouteGuid,
        filters: &[Filter],
    ) -> CallResult<Vec<Application>>;
}
