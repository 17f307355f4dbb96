use std::sync::Arc;

use ironic_api::{DriverCatalog, HealthCheck};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::ReadinessCache;
use crate::poll::{Deadline, PollSettings};
use crate::prober::wait_reachable;
use crate::readiness::{
    DriverPolicy, ReadinessReport, Service, ServiceReport, WaitError, WaitOutcome,
};
use crate::verifier::wait_for_drivers;

/// Waits for Ironic (reachable, then drivers registered) and Ironic Inspector
/// (reachable) in two independent tasks against one shared deadline.
///
/// Results are memoized per service, so repeated or concurrent calls to
/// [`Orchestrator::wait`] never poll a service twice.
pub struct Orchestrator<P, I> {
    provisioning: Arc<P>,
    inspection: Arc<I>,
    settings: PollSettings,
    driver_policy: DriverPolicy,
    cache: Arc<ReadinessCache>,
    cancel: CancellationToken,
}

impl<P, I> Orchestrator<P, I>
where
    P: HealthCheck + DriverCatalog + 'static,
    I: HealthCheck + 'static,
{
    pub fn new(provisioning: P, inspection: I, settings: PollSettings) -> Self {
        Self {
            provisioning: Arc::new(provisioning),
            inspection: Arc::new(inspection),
            settings,
            driver_policy: DriverPolicy::default(),
            cache: Arc::new(ReadinessCache::new()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_driver_policy(mut self, driver_policy: DriverPolicy) -> Self {
        self.driver_policy = driver_policy;
        self
    }

    /// Token that aborts every in-progress wait when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cache(&self) -> &ReadinessCache {
        &self.cache
    }

    pub async fn wait(&self) -> ReadinessReport {
        let deadline = Deadline::after(self.settings.timeout);
        info!(
            timeout = ?self.settings.timeout,
            retry_interval = ?self.settings.retry_interval,
            "waiting for Ironic and Ironic Inspector"
        );

        let provisioning = self.spawn_provisioning(deadline);
        let inspection = self.spawn_inspection(deadline);
        let (provisioning, inspection) = tokio::join!(provisioning, inspection);

        ReadinessReport {
            provisioning: joined(Service::Provisioning, provisioning),
            inspection: joined(Service::Inspection, inspection),
            driver_policy: self.driver_policy,
        }
    }

    /// Single non-polling check: Ironic root, then its drivers, then the
    /// Inspector root. Stops at the first step that is not ready.
    pub async fn check_once(&self) -> bool {
        let request_timeout = self.settings.request_timeout;

        let ironic_up = tokio::time::timeout(request_timeout, self.provisioning.is_healthy()).await;
        if !matches!(ironic_up, Ok(Ok(true))) {
            debug!(result = ?ironic_up, "Ironic is not reachable");
            return false;
        }

        match tokio::time::timeout(request_timeout, self.provisioning.list_drivers()).await {
            Ok(Ok(drivers)) if !drivers.is_empty() => {}
            Ok(Ok(_)) => {
                debug!("Ironic has no registered drivers");
                return false;
            }
            Ok(Err(e)) => {
                debug!(error = %e, "listing Ironic drivers failed");
                return false;
            }
            Err(_) => {
                debug!("listing Ironic drivers timed out");
                return false;
            }
        }

        let inspector_up = tokio::time::timeout(request_timeout, self.inspection.is_healthy()).await;
        if !matches!(inspector_up, Ok(Ok(true))) {
            debug!(result = ?inspector_up, "Ironic Inspector is not reachable");
            return false;
        }
        true
    }

    fn spawn_provisioning(&self, deadline: Deadline) -> JoinHandle<ServiceReport> {
        let client = Arc::clone(&self.provisioning);
        let cache = Arc::clone(&self.cache);
        let settings = self.settings;
        let driver_policy = self.driver_policy;
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            cache
                .get_or_compute(Service::Provisioning, || async {
                    let service = Service::Provisioning;
                    let reachable =
                        wait_reachable(&*client, service, deadline, &settings, &cancel).await;
                    if !reachable.is_ready() {
                        return ServiceReport {
                            service,
                            reachable,
                            drivers: None,
                        };
                    }

                    let drivers = wait_for_drivers(&*client, deadline, &settings, &cancel).await;
                    if let WaitOutcome::TimedOut { attempts } = drivers {
                        match driver_policy {
                            DriverPolicy::Advisory => warn!(
                                attempts,
                                "no drivers registered with Ironic yet, continuing"
                            ),
                            DriverPolicy::Required => {
                                warn!(attempts, "no drivers registered with Ironic")
                            }
                        }
                    }
                    ServiceReport {
                        service,
                        reachable,
                        drivers: Some(drivers),
                    }
                })
                .await
        })
    }

    fn spawn_inspection(&self, deadline: Deadline) -> JoinHandle<ServiceReport> {
        let client = Arc::clone(&self.inspection);
        let cache = Arc::clone(&self.cache);
        let settings = self.settings;
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            cache
                .get_or_compute(Service::Inspection, || async {
                    let service = Service::Inspection;
                    let reachable =
                        wait_reachable(&*client, service, deadline, &settings, &cancel).await;
                    ServiceReport {
                        service,
                        reachable,
                        drivers: None,
                    }
                })
                .await
        })
    }
}

fn joined(
    service: Service,
    result: Result<ServiceReport, tokio::task::JoinError>,
) -> Result<ServiceReport, WaitError> {
    result.map_err(|e| WaitError::TaskFailed {
        service,
        reason: e.to_string(),
    })
}

impl<P, I> std::fmt::Debug for Orchestrator<P, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings)
            .field("driver_policy", &self.driver_policy)
            .finish()
    }
}
