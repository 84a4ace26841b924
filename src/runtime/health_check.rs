//! Conditional health-check updates.

use tracing::debug;

use crate::domain::{Application, ApplicationPatch, SpaceGuid, Warnings};
use crate::error::ActionError;
use crate::port::ControlPlaneClient;

use super::query::{get_application_by_name_and_space, ActionResult};

/// Health-check type whose endpoint field participates in the comparison.
const HTTP_HEALTH_CHECK: &str = "http";

/// Endpoint value treated as "unset" by the client-side precondition.
const DEFAULT_HTTP_ENDPOINT: &str = "/";

/// Set an application's health-check type, updating only when the desired
/// state differs from the observed one.
///
/// The update is skipped when the current type already equals the desired
/// type and, for the "http" type, the current endpoint already equals the
/// desired endpoint. An endpoint other than the default supplied together
/// with a non-"http" type fails with
/// [`ActionError::HttpHealthCheckInvalid`] before any round trip.
pub async fn set_application_health_check_type_by_name_and_space<C>(
    client: &C,
    name: &str,
    space_guid: &SpaceGuid,
    desired_type: &str,
    desired_http_endpoint: &str,
) -> ActionResult<Application>
where
    C: ControlPlaneClient + ?Sized,
{
    if desired_type != HTTP_HEALTH_CHECK && desired_http_endpoint != DEFAULT_HTTP_ENDPOINT {
        return (Warnings::new(), Err(ActionError::HttpHealthCheckInvalid));
    }

    let (mut warnings, result) =
        get_application_by_name_and_space(client, name, space_guid).await;
    let app = match result {
        Ok(app) => app,
        Err(err) => return (warnings, Err(err)),
    };

    let update_needed = app.health_check_type != desired_type
        || (desired_type == HTTP_HEALTH_CHECK
            && app.health_check_http_endpoint != desired_http_endpoint);

    if !update_needed {
        debug!(
            name,
            health_check_type = desired_type,
            "Health check already in desired state"
        );
        return (warnings, Ok(app));
    }

    let mut patch =
        ApplicationPatch::new(app.guid.clone()).with_health_check_type(desired_type);
    if desired_type == HTTP_HEALTH_CHECK {
        patch = patch.with_health_check_endpoint(desired_http_endpoint);
    }

    let (update_warnings, update_result) = client.update_application(patch).await;
    warnings.extend(update_warnings);
    (warnings, update_result.map_err(ActionError::from))
}
