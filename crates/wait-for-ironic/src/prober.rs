use ironic_api::HealthCheck;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::poll::{Deadline, PollSettings, poll_until};
use crate::readiness::{Service, WaitOutcome};

/// Poll `target`'s root status until it answers 200 or the deadline passes.
///
/// Connection errors and non-200 answers are both just another retry.
#[instrument(skip_all, fields(service = %service))]
pub async fn wait_reachable<C>(
    target: &C,
    service: Service,
    deadline: Deadline,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> WaitOutcome
where
    C: HealthCheck + ?Sized,
{
    let outcome = poll_until(deadline, settings, cancel, move || async move {
        match target.is_healthy().await {
            Ok(true) => true,
            Ok(false) => {
                debug!("service answered with a non-200 status");
                false
            }
            Err(e) => {
                debug!(error = %e, "service not reachable");
                false
            }
        }
    })
    .await;

    match outcome {
        WaitOutcome::Ready { attempts } => info!(attempts, "service reachable"),
        WaitOutcome::TimedOut { attempts } => warn!(attempts, "gave up waiting for service"),
        WaitOutcome::Cancelled { attempts } => info!(attempts, "wait cancelled"),
    }
    outcome
}
