use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::readiness::{Service, ServiceReport};

/// Per-process memo of each service's readiness report.
///
/// A report is computed at most once per service. Callers that arrive while
/// the computation is running await the same in-flight future instead of
/// starting a second poll. The map lock is only held to look up the cell.
#[derive(Debug, Default)]
pub struct ReadinessCache {
    entries: Mutex<HashMap<Service, Arc<OnceCell<ServiceReport>>>>,
}

impl ReadinessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored report for `service`, running `compute` if no caller
    /// has produced one yet.
    pub async fn get_or_compute<F, Fut>(&self, service: Service, compute: F) -> ServiceReport
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ServiceReport>,
    {
        let cell = self.cell(service);
        if let Some(report) = cell.get() {
            debug!(%service, "using cached readiness report");
            return report.clone();
        }
        cell.get_or_init(compute).await.clone()
    }

    /// The stored report for `service`, if its wait has finished.
    pub fn get(&self, service: Service) -> Option<ServiceReport> {
        self.cell(service).get().cloned()
    }

    fn cell(&self, service: Service) -> Arc<OnceCell<ServiceReport>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(service).or_default())
    }
}
