//! Notification service
//!
//! Sends the first-open notification and the unopened follow-up reminder.
//! Both are at-most-once per track: the repository scan only returns tracks
//! whose notified timestamp is still NULL, and the timestamp is written
//! only after the send succeeds.

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};
use track_core::entities::TrackedMessage;
use track_notify::{first_open_email, follow_up_email, Mailer};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Counts from one notification scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub first_open_sent: usize,
    pub follow_up_sent: usize,
}

/// Notification service
pub struct NotifyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotifyService<'a> {
    /// Create a new NotifyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One scan over both pending sets
    ///
    /// Send failures are logged and leave the notified timestamp NULL so the
    /// next scan retries. With no mailer configured this is a no-op.
    #[instrument(skip(self))]
    pub async fn run_pending(&self) -> ServiceResult<ScanOutcome> {
        let Some(mailer) = self.ctx.mailer() else {
            return Ok(ScanOutcome::default());
        };

        let window = self.ctx.suppression_window();
        let mut outcome = ScanOutcome::default();

        for track in self
            .ctx
            .track_repo()
            .find_first_open_pending(window)
            .await?
        {
            match self.send_first_open(mailer, &track, window).await {
                Ok(()) => outcome.first_open_sent += 1,
                Err(e) => {
                    warn!(track_id = %track.id, error = %e, "First-open notification failed");
                }
            }
        }

        let min_age = self.ctx.notify_config().follow_up_after();
        for track in self
            .ctx
            .track_repo()
            .find_follow_up_pending(window, min_age)
            .await?
        {
            match self.send_follow_up(mailer, &track).await {
                Ok(()) => outcome.follow_up_sent += 1,
                Err(e) => {
                    warn!(track_id = %track.id, error = %e, "Follow-up reminder failed");
                }
            }
        }

        if outcome != ScanOutcome::default() {
            info!(
                first_open = outcome.first_open_sent,
                follow_up = outcome.follow_up_sent,
                "Notification scan sent mail"
            );
        }

        Ok(outcome)
    }

    async fn send_first_open(
        &self,
        mailer: &Mailer,
        track: &TrackedMessage,
        window: Duration,
    ) -> ServiceResult<()> {
        // The track can be deleted between the pending scan and here; the
        // missing open skips the send and the next scan re-evaluates.
        let open = self
            .ctx
            .open_repo()
            .first_genuine_open(track.id, window)
            .await?
            .ok_or_else(|| ServiceError::internal("pending track has no genuine open"))?;

        let email = first_open_email(track, &open);
        mailer
            .send(&email)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        self.ctx
            .track_repo()
            .mark_first_open_notified(track.id, Utc::now())
            .await?;

        info!(track_id = %track.id, "First-open notification sent");
        Ok(())
    }

    async fn send_follow_up(&self, mailer: &Mailer, track: &TrackedMessage) -> ServiceResult<()> {
        let email = follow_up_email(track, Utc::now());
        mailer
            .send(&email)
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        self.ctx
            .track_repo()
            .mark_follow_up_notified(track.id, Utc::now())
            .await?;

        info!(track_id = %track.id, "Follow-up reminder sent");
        Ok(())
    }
}
