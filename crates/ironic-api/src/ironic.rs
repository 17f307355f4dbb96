use std::collections::HashSet;

use reqwest::StatusCode;
use tracing::debug;

use crate::client::{ApiError, Endpoint, HttpClient};
use crate::drivers::{Driver, DriverCatalog, DriverPage};
use crate::health::HealthCheck;

/// Upper bound on pages followed in a single driver listing.
pub const MAX_PAGES: usize = 100;

/// Client for the Ironic bare-metal provisioning API.
///
/// `endpoint` is the versioned API root (e.g. `http://ironic:6385/v1/`).
/// Reachability is `GET /v1` returning 200; registered drivers come from the
/// paginated `GET /v1/drivers` collection.
#[derive(Debug, Clone)]
pub struct IronicClient {
    http: HttpClient,
}

impl IronicClient {
    pub fn new(endpoint: Endpoint) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.http.endpoint()
    }

    /// GET `/v1/drivers`, following `next` links until the collection is
    /// exhausted.
    ///
    /// Any failing page fails the whole listing so callers never see a
    /// partial count.
    pub async fn list_drivers(&self) -> Result<Vec<Driver>, ApiError> {
        let mut url = self.http.endpoint().join("drivers")?;
        let mut visited = HashSet::new();
        let mut drivers = Vec::new();

        loop {
            if visited.len() >= MAX_PAGES {
                return Err(ApiError::Pagination(format!(
                    "more than {MAX_PAGES} pages of drivers"
                )));
            }
            if !visited.insert(url.clone()) {
                return Err(ApiError::Pagination(format!(
                    "next link {url} points to an already visited page"
                )));
            }

            let page: DriverPage = self.http.get_url(url).await?;
            debug!(count = page.drivers.len(), page = visited.len(), "fetched driver page");
            drivers.extend(page.drivers);

            match page.next.as_deref().map(str::trim) {
                Some(next) if !next.is_empty() => url = self.http.endpoint().join(next)?,
                _ => return Ok(drivers),
            }
        }
    }
}

impl HealthCheck for IronicClient {
    async fn is_healthy(&self) -> Result<bool, ApiError> {
        let status = self.http.root_status().await?;
        Ok(status == StatusCode::OK)
    }
}

impl DriverCatalog for IronicClient {
    async fn list_drivers(&self) -> Result<Vec<Driver>, ApiError> {
        IronicClient::list_drivers(self).await
    }
}
