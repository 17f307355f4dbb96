//! HTTP clients for the Ironic provisioning API and the Ironic Inspector API.

pub mod client;
pub mod drivers;
pub mod health;
pub mod inspector;
pub mod ironic;

pub use client::{ApiError, Endpoint, HttpClient, MICROVERSION_HEADER};
pub use drivers::{Driver, DriverCatalog};
pub use health::HealthCheck;
pub use inspector::InspectorClient;
pub use ironic::{IronicClient, MAX_PAGES};
