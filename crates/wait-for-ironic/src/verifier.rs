use ironic_api::DriverCatalog;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::poll::{Deadline, PollSettings, poll_until};
use crate::readiness::WaitOutcome;

/// Poll the driver listing until at least one driver is registered.
///
/// A failed listing, including one that broke partway through its pages,
/// counts as zero drivers for that attempt; the next attempt starts again
/// from the first page.
#[instrument(skip_all)]
pub async fn wait_for_drivers<C>(
    catalog: &C,
    deadline: Deadline,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> WaitOutcome
where
    C: DriverCatalog + ?Sized,
{
    poll_until(deadline, settings, cancel, move || async move {
        match catalog.list_drivers().await {
            Ok(drivers) if !drivers.is_empty() => {
                let names: Vec<_> = drivers.iter().map(|d| d.name.as_str()).collect();
                info!(count = drivers.len(), ?names, "drivers registered");
                true
            }
            Ok(_) => {
                debug!("no drivers registered yet");
                false
            }
            Err(e) => {
                debug!(error = %e, "listing drivers failed");
                false
            }
        }
    })
    .await
}
