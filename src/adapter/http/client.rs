//! Control-plane REST API client.
//!
//! Default implementation of the [`ControlPlaneClient`] port against the
//! platform's v2-style REST surface. Advisory warnings arrive on the
//! `X-Platform-Warnings` response header and are surfaced on every call,
//! including failed ones.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::dto::{
    into_instance_snapshot, ApplicationResource, ApplicationsPage, InstanceResource,
    UpdateApplicationBody,
};
use crate::config::Config;
use crate::domain::{
    AppGuid, Application, ApplicationPatch, InstanceSnapshot, RouteGuid, Warnings,
};
use crate::error::ClientError;
use crate::port::{CallResult, ControlPlaneClient, Filter};

/// Response header carrying comma-separated advisory warnings.
const WARNINGS_HEADER: &str = "X-Platform-Warnings";

/// HTTP client for the control-plane REST API.
pub struct HttpControlPlaneClient {
    http: HttpClient,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpControlPlaneClient {
    /// Create a new client against the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the control-plane API
    ///   (e.g., `https://api.run.skylift.io`)
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            http: HttpClient::new(),
            base_url,
            bearer_token: None,
        }
    }

    /// Create a client from configuration, with request timeouts applied.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.network.request_timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.network.api_url.clone(),
            bearer_token: None,
        }
    }

    /// Attach a bearer credential sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let url = Url::parse(&self.base_url)?.join(path)?;
        Ok(url)
    }

    fn warnings_from(response: &Response) -> Warnings {
        response
            .headers()
            .get_all(WARNINGS_HEADER)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(|warning| warning.trim().to_string())
            .filter(|warning| !warning.is_empty())
            .collect()
    }

    fn filter_query(filters: &[Filter]) -> Vec<(&'static str, String)> {
        filters
            .iter()
            .map(|filter| ("q", format!("{}:{}", filter.key, filter.value)))
            .collect()
    }

    async fn request_json<T>(&self, request: RequestBuilder) -> CallResult<T>
    where
        T: DeserializeOwned,
    {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return (Warnings::new(), Err(err.into())),
        };

        let warnings = Self::warnings_from(&response);
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return (warnings, Err(ClientError::ResourceNotFound));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return (
                warnings,
                Err(ClientError::Api {
                    status: status.as_u16(),
                    body,
                }),
            );
        }

        match response.json::<T>().await {
            Ok(parsed) => (warnings, Ok(parsed)),
            Err(err) => (warnings, Err(err.into())),
        }
    }
}

#[async_trait]
impl ControlPlaneClient for HttpControlPlaneClient {
    async fn get_application(&self, guid: &AppGuid) -> CallResult<Application> {
        let url = match self.endpoint(&format!("/v2/apps/{guid}")) {
            Ok(url) => url,
            Err(err) => return (Warnings::new(), Err(err)),
        };

        debug!(%url, "Fetching application");
        let (warnings, result) = self
            .request_json::<ApplicationResource>(self.http.get(url))
            .await;
        (warnings, result.map(ApplicationResource::into_application))
    }

    async fn get_applications(&self, filters: &[Filter]) -> CallResult<Vec<Application>> {
        let url = match self.endpoint("/v2/apps") {
            Ok(url) => url,
            Err(err) => return (Warnings::new(), Err(err)),
        };

        debug!(%url, filters = filters.len(), "Fetching applications");
        let request = self.http.get(url).query(&Self::filter_query(filters));
        let (warnings, result) = self.request_json::<ApplicationsPage>(request).await;
        (warnings, result.map(ApplicationsPage::into_applications))
    }

    async fn update_application(&self, patch: ApplicationPatch) -> CallResult<Application> {
        let url = match self.endpoint(&format!("/v2/apps/{}", patch.guid)) {
            Ok(url) => url,
            Err(err) => return (Warnings::new(), Err(err)),
        };

        debug!(%url, "Updating application");
        let body = UpdateApplicationBody::from(&patch);
        let request = self.http.put(url).json(&body);
        let (warnings, result) = self.request_json::<ApplicationResource>(request).await;
        (warnings, result.map(ApplicationResource::into_application))
    }

    async fn get_application_instances(&self, guid: &AppGuid) -> CallResult<InstanceSnapshot> {
        let url = match self.endpoint(&format!("/v2/apps/{guid}/instances")) {
            Ok(url) => url,
            Err(err) => return (Warnings::new(), Err(err)),
        };

        debug!(%url, "Fetching application instances");
        let (warnings, result) = self
            .request_json::<HashMap<String, InstanceResource>>(self.http.get(url))
            .await;
        (warnings, result.map(into_instance_snapshot))
    }

    async fn get_route_applications(
        &self,
        route_guid: &RouteGuid,
        filters: &[Filter],
    ) -> CallResult<Vec<Application>> {
        let url = match self.endpoint(&format!("/v2/routes/{route_guid}/apps")) {
            Ok(url) => url,
            Err(err) => return (Warnings::new(), Err(err)),
        };

        debug!(%url, filters = filters.len(), "Fetching route applications");
        let request = self.http.get(url).query(&Self::filter_query(filters));
        let (warnings, result) = self.request_json::<ApplicationsPage>(request).await;
        (warnings, result.map(ApplicationsPage::into_applications))
    }
}
