use reqwest::StatusCode;

use crate::client::{ApiError, Endpoint, HttpClient};
use crate::health::HealthCheck;

/// Client for the Ironic Inspector API.
///
/// Only reachability is checked: `GET {endpoint}` (trailing slash stripped)
/// must return exactly 200.
#[derive(Debug, Clone)]
pub struct InspectorClient {
    http: HttpClient,
}

impl InspectorClient {
    pub fn new(endpoint: Endpoint) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.http.endpoint()
    }
}

impl HealthCheck for InspectorClient {
    async fn is_healthy(&self) -> Result<bool, ApiError> {
        let status = self.http.root_status().await?;
        Ok(status == StatusCode::OK)
    }
}
