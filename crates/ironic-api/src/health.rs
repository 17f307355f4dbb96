use crate::client::ApiError;

/// Uniform reachability interface for the Ironic-family API clients.
///
/// Each client implements this by requesting its root status path. The
/// readiness waiter polls it until it reports `Ok(true)`.
pub trait HealthCheck: Send + Sync {
    /// Returns `Ok(true)` if the service answered with HTTP 200, `Ok(false)` if
    /// it answered with any other status, or `Err` on connection failure.
    fn is_healthy(&self) -> impl std::future::Future<Output = Result<bool, ApiError>> + Send;
}
