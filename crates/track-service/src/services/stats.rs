//! Analytics service
//!
//! Global counters, open-time histograms, and per-recipient engagement.
//! Everything is computed over stored rows at query time; nothing here
//! writes.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::instrument;
use track_core::analytics::{engagement_score, split_addresses, EngagementInput};
use track_core::entities::RecipientRollup;

use crate::dto::{RecipientEngagementResponse, StatsResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Analytics service
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Global statistics across every track
    #[instrument(skip(self))]
    pub async fn global_stats(&self) -> ServiceResult<StatsResponse> {
        let window = self.ctx.suppression_window();

        let (
            total_tracks,
            total_opens,
            genuine_opens,
            tracks_with_opens,
            tracks_with_genuine_opens,
            by_hour,
            by_weekday,
        ) = tokio::try_join!(
            self.ctx.track_repo().count(),
            self.ctx.open_repo().count(),
            self.ctx.open_repo().count_genuine(window),
            self.ctx.open_repo().count_tracks_with_opens(),
            self.ctx.open_repo().count_tracks_with_genuine_opens(window),
            self.ctx.open_repo().genuine_opens_by_hour(window),
            self.ctx.open_repo().genuine_opens_by_weekday(window),
        )?;

        let open_rate = if total_tracks == 0 {
            0.0
        } else {
            tracks_with_genuine_opens as f64 / total_tracks as f64
        };

        Ok(StatsResponse {
            total_tracks,
            total_opens,
            genuine_opens,
            tracks_with_opens,
            tracks_with_genuine_opens,
            open_rate,
            opens_by_hour: fill_buckets(24, by_hour.iter().map(|b| (b.hour, b.count))),
            opens_by_weekday: fill_buckets(7, by_weekday.iter().map(|b| (b.weekday, b.count))),
        })
    }

    /// Per-recipient engagement, sorted by score descending
    #[instrument(skip(self))]
    pub async fn recipient_engagement(&self) -> ServiceResult<Vec<RecipientEngagementResponse>> {
        let rollups = self
            .ctx
            .track_repo()
            .recipient_rollups(self.ctx.suppression_window())
            .await?;

        Ok(aggregate_recipients(rollups, Utc::now()))
    }
}

/// Dense histogram from sparse buckets; out-of-range indexes are dropped
fn fill_buckets(len: usize, counts: impl Iterator<Item = (i32, i64)>) -> Vec<i64> {
    let mut slots = vec![0i64; len];
    for (index, count) in counts {
        if let Some(slot) = usize::try_from(index).ok().and_then(|i| slots.get_mut(i)) {
            *slot = count;
        }
    }
    slots
}

#[derive(Default)]
struct RecipientAccum {
    tracks_sent: u64,
    tracks_opened: u64,
    genuine_opens: u64,
    last_open_at: Option<DateTime<Utc>>,
}

/// Fold per-track rollups into per-address aggregates and score them
///
/// A track listing several addresses counts once for each of them; the same
/// address repeated within one track still counts once.
fn aggregate_recipients(
    rollups: Vec<RecipientRollup>,
    now: DateTime<Utc>,
) -> Vec<RecipientEngagementResponse> {
    let mut per_address: HashMap<String, RecipientAccum> = HashMap::new();

    for rollup in rollups {
        let mut addresses = match rollup.recipient.as_deref() {
            Some(raw) => split_addresses(raw),
            None => continue,
        };
        addresses.sort_unstable();
        addresses.dedup();

        for address in addresses {
            let entry = per_address.entry(address).or_default();
            entry.tracks_sent += 1;
            if rollup.genuine_opens > 0 {
                entry.tracks_opened += 1;
            }
            entry.genuine_opens += u64::try_from(rollup.genuine_opens).unwrap_or(0);
            entry.last_open_at = match (entry.last_open_at, rollup.last_genuine_open_at) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
    }

    let mut responses: Vec<_> = per_address
        .into_iter()
        .map(|(recipient, accum)| {
            let days_since_last_open = accum
                .last_open_at
                .map(|at| (now - at).num_seconds() as f64 / SECONDS_PER_DAY);

            let engagement_score = engagement_score(&EngagementInput {
                tracks_sent: accum.tracks_sent,
                tracks_opened: accum.tracks_opened,
                genuine_opens: accum.genuine_opens,
                days_since_last_open,
            });

            RecipientEngagementResponse {
                recipient,
                tracks_sent: accum.tracks_sent,
                tracks_opened: accum.tracks_opened,
                genuine_opens: accum.genuine_opens,
                last_open_at: accum.last_open_at,
                engagement_score,
            }
        })
        .collect();

    responses.sort_by(|a, b| {
        b.engagement_score
            .partial_cmp(&a.engagement_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.recipient.cmp(&b.recipient))
    });

    responses
}
