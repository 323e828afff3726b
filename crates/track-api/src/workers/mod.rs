//! Background workers
//!
//! The notification worker scans for pending first-open and follow-up
//! notifications on a fixed interval inside the API process.

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use track_service::NotifyService;

use crate::state::AppState;

/// Spawn the notification scan loop
///
/// Runs until the process exits. Scan errors are logged and the loop
/// continues; SMTP failures leave the pending rows untouched so the next
/// scan retries them.
pub fn spawn_notify_worker(state: AppState) -> JoinHandle<()> {
    let interval = state.config().notify.scan_interval();
    info!(
        interval_secs = interval.as_secs(),
        "Notification worker started"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let service = NotifyService::new(state.service_context());
            if let Err(e) = service.run_pending().await {
                warn!(error = %e, "Notification scan failed");
            }
        }
    })
}
