//! Single-shot application queries against the control plane.
//!
//! Thin passthroughs with light result shaping: not-found conditions are
//! mapped onto [`ActionError::ApplicationNotFound`] carrying the lookup key
//! the caller used, and warnings are propagated untouched on both the
//! success and the error path.

use tracing::debug;

use crate::domain::{AppGuid, Application, RouteGuid, SpaceGuid, Warnings};
use crate::error::{ActionError, ClientError};
use crate::port::{ControlPlaneClient, Filter, FilterKey};

/// Outcome of one action-layer operation: warnings alongside the result,
/// mirroring the shape of the underlying client calls.
pub type ActionResult<T> = (Warnings, Result<T, ActionError>);

/// Fetch one application by GUID.
///
/// A not-found response from the control plane is shaped into
/// [`ActionError::ApplicationNotFound`] with the GUID as the lookup key;
/// any other client error is surfaced unchanged.
pub async fn get_application<C: ControlPlaneClient + ?Sized>(
    client: &C,
    guid: &AppGuid,
) -> ActionResult<Application> {
    let (warnings, result) = client.get_application(guid).await;
    let result = result.map_err(|err| match err {
        ClientError::ResourceNotFound => ActionError::ApplicationNotFound {
            lookup: guid.to_string(),
        },
        other => other.into(),
    });
    (warnings, result)
}

/// Fetch the application with the given name in the given space.
///
/// The lookup combines two equality filters. An empty result set is shaped
/// into [`ActionError::ApplicationNotFound`] with the name as the lookup
/// key; with multiple matches (not expected from the platform) the first
/// one wins.
pub async fn get_application_by_name_and_space<C: ControlPlaneClient + ?Sized>(
    client: &C,
    name: &str,
    space_guid: &SpaceGuid,
) -> ActionResult<Application> {
    let filters = [
        Filter::equal(FilterKey::Name, name),
        Filter::equal(FilterKey::SpaceGuid, space_guid.as_str()),
    ];
    let (warnings, result) = client.get_applications(&filters).await;

    let result = match result {
        Err(err) => Err(err.into()),
        Ok(mut apps) => {
            if apps.is_empty() {
                debug!(name, space_guid = %space_guid, "No application matched");
                Err(ActionError::ApplicationNotFound {
                    lookup: name.to_string(),
                })
            } else {
                Ok(apps.swap_remove(0))
            }
        }
    };
    (warnings, result)
}

/// Fetch the applications bound to a route.
///
/// Caller-supplied filters are appended to, never replace, the mandatory
/// route binding.
pub async fn get_route_applications<C: ControlPlaneClient + ?Sized>(
    client: &C,
    route_guid: &RouteGuid,
    filters: &[Filter],
) -> ActionResult<Vec<Application>> {
    let (warnings, result) = client.get_route_applications(route_guid, filters).await;
    (warnings, result.map_err(ActionError::from))
}
