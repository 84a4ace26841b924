//! Scripted [`ControlPlaneClient`] test double.
//!
//! Responses are explicit per-call queues consumed in order, so a test
//! reads as a call-sequence table ("first poll returns pending, second
//! returns staged") instead of mutable counters sprinkled through test
//! code. Calls beyond the scripted sequence fail loudly with a recognizable
//! error instead of panicking inside a spawned task.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{
    AppGuid, Application, ApplicationPatch, InstanceSnapshot, RouteGuid, Warnings,
};
use crate::error::ClientError;
use crate::port::{CallResult, ControlPlaneClient, Filter};

/// Build a successful scripted response with the given warnings.
pub fn ok<T>(value: T, warnings: &[&str]) -> CallResult<T> {
    (Warnings::from(warnings), Ok(value))
}

/// Build a failed scripted response with the given warnings.
pub fn fail<T>(err: ClientError, warnings: &[&str]) -> CallResult<T> {
    (Warnings::from(warnings), Err(err))
}

fn next<T>(queue: &Mutex<VecDeque<CallResult<T>>>, method: &'static str) -> CallResult<T> {
    queue.lock().pop_front().unwrap_or_else(|| {
        (
            Warnings::new(),
            Err(ClientError::Other(format!("unscripted {method} call"))),
        )
    })
}

/// Deterministic control-plane client backed by scripted response queues.
#[derive(Default)]
pub struct ScriptedControlPlane {
    get_application_responses: Mutex<VecDeque<CallResult<Application>>>,
    get_applications_responses: Mutex<VecDeque<CallResult<Vec<Application>>>>,
    update_application_responses: Mutex<VecDeque<CallResult<Application>>>,
    get_instances_responses: Mutex<VecDeque<CallResult<InstanceSnapshot>>>,
    get_route_applications_responses: Mutex<VecDeque<CallResult<Vec<Application>>>>,

    get_application_calls: AtomicU32,
    get_applications_calls: AtomicU32,
    update_application_calls: AtomicU32,
    get_instances_calls: AtomicU32,
    get_route_applications_calls: AtomicU32,

    fetched_guids: Mutex<Vec<AppGuid>>,
    applications_filters: Mutex<Vec<Vec<Filter>>>,
    update_patches: Mutex<Vec<ApplicationPatch>>,
    instance_guids: Mutex<Vec<AppGuid>>,
    route_requests: Mutex<Vec<(RouteGuid, Vec<Filter>)>>,
}

impl ScriptedControlPlane {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `get_application` response.
    #[must_use]
    pub fn with_get_application(self, response: CallResult<Application>) -> Self {
        self.get_application_responses.lock().push_back(response);
        self
    }

    /// Script the next `get_applications` response.
    #[must_use]
    pub fn with_get_applications(self, response: CallResult<Vec<Application>>) -> Self {
        self.get_applications_responses.lock().push_back(response);
        self
    }

    /// Script the next `update_application` response.
    #[must_use]
    pub fn with_update_application(self, response: CallResult<Application>) -> Self {
        self.update_application_responses.lock().push_back(response);
        self
    }

    /// Script the next `get_application_instances` response.
    #[must_use]
    pub fn with_instances(self, response: CallResult<InstanceSnapshot>) -> Self {
        self.get_instances_responses.lock().push_back(response);
        self
    }

    /// Script the next `get_route_applications` response.
    #[must_use]
    pub fn with_route_applications(self, response: CallResult<Vec<Application>>) -> Self {
        self.get_route_applications_responses
            .lock()
            .push_back(response);
        self
    }

    /// How many times `get_application` was called.
    pub fn get_application_calls(&self) -> u32 {
        self.get_application_calls.load(Ordering::SeqCst)
    }

    /// How many times `get_applications` was called.
    pub fn get_applications_calls(&self) -> u32 {
        self.get_applications_calls.load(Ordering::SeqCst)
    }

    /// How many times `update_application` was called.
    pub fn update_application_calls(&self) -> u32 {
        self.update_application_calls.load(Ordering::SeqCst)
    }

    /// How many times `get_application_instances` was called.
    pub fn get_instances_calls(&self) -> u32 {
        self.get_instances_calls.load(Ordering::SeqCst)
    }

    /// How many times `get_route_applications` was called.
    pub fn get_route_applications_calls(&self) -> u32 {
        self.get_route_applications_calls.load(Ordering::SeqCst)
    }

    /// GUIDs passed to `get_application`, in call order.
    pub fn fetched_guids(&self) -> Vec<AppGuid> {
        self.fetched_guids.lock().clone()
    }

    /// Filter sets passed to `get_applications`, in call order.
    pub fn applications_filters(&self) -> Vec<Vec<Filter>> {
        self.applications_filters.lock().clone()
    }

    /// Patches passed to `update_application`, in call order.
    pub fn update_patches(&self) -> Vec<ApplicationPatch> {
        self.update_patches.lock().clone()
    }

    /// GUIDs passed to `get_application_instances`, in call order.
    pub fn instance_guids(&self) -> Vec<AppGuid> {
        self.instance_guids.lock().clone()
    }

    /// Route requests passed to `get_route_applications`, in call order.
    pub fn route_requests(&self) -> Vec<(RouteGuid, Vec<Filter>)> {
        self.route_requests.lock().clone()
    }
}

#[async_trait]
impl ControlPlaneClient for ScriptedControlPlane {
    async fn get_application(&self, guid: &AppGuid) -> CallResult<Application> {
        self.get_application_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched_guids.lock().push(guid.clone());
        next(&self.get_application_responses, "get_application")
    }

    async fn get_applications(&self, filters: &[Filter]) -> CallResult<Vec<Application>> {
        self.get_applications_calls.fetch_add(1, Ordering::SeqCst);
        self.applications_filters.lock().push(filters.to_vec());
        next(&self.get_applications_responses, "get_applications")
    }

    async fn update_application(&self, patch: ApplicationPatch) -> CallResult<Application> {
        self.update_application_calls.fetch_add(1, Ordering::SeqCst);
        self.update_patches.lock().push(patch);
        next(&self.update_application_responses, "update_application")
    }

    async fn get_application_instances(&self, guid: &AppGuid) -> CallResult<InstanceSnapshot> {
        self.get_instances_calls.fetch_add(1, Ordering::SeqCst);
        self.instance_guids.lock().push(guid.clone());
        next(&self.get_instances_responses, "get_application_instances")
    }

    async fn get_route_applications(
        &self,
        route_guid: &RouteGuid,
        filters: &[Filter],
    ) -> CallResult<Vec<Application>> {
        self.get_route_applications_calls
            .fetch_add(1, Ordering::SeqCst);
        self.route_requests
            .lock()
            .push((route_guid.clone(), filters.to_vec()));
        next(
            &self.get_route_applications_responses,
            "get_route_applications",
        )
    }
}
