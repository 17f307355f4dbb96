use serde::Deserialize;

use crate::client::ApiError;

/// A hardware driver registered with Ironic by at least one conductor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Driver {
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default, rename = "type")]
    pub driver_type: Option<String>,
}

/// One page of `GET /v1/drivers`.
///
/// Ironic collections carry a `next` link when more results are available.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DriverPage {
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Source of registered driver records.
///
/// Implementations must return either every driver across all pages or an
/// error; a partially walked listing is never returned.
pub trait DriverCatalog: Send + Sync {
    fn list_drivers(&self) -> impl std::future::Future<Output = Result<Vec<Driver>, ApiError>> + Send;
}
