//! PostgreSQL implementation of TrackRepository

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use track_core::entities::{RecipientRollup, TrackOpenSummary, TrackedMessage};
use track_core::traits::{RepoResult, TrackFilter, TrackRepository};
use track_core::value_objects::TrackingId;

use crate::models::{RecipientRollupModel, TrackModel, TrackSummaryModel};

use super::error::{map_db_error, track_not_found};
use super::suppression_secs;

/// Rows returned when the caller does not name a limit
const DEFAULT_LIST_LIMIT: i64 = 100;
/// Hard cap on list size regardless of the requested limit
const MAX_LIST_LIMIT: i64 = 500;

/// PostgreSQL implementation of TrackRepository
#[derive(Clone)]
pub struct PgTrackRepository {
    pool: PgPool,
}

impl PgTrackRepository {
    /// Create a new PgTrackRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so search input matches literally
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait]
impl TrackRepository for PgTrackRepository {
    #[instrument(skip(self))]
    async fn create(&self, track: &TrackedMessage) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tracked_messages
                (id, recipient, subject, notes, message_group_id, pinned, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(track.id.into_inner())
        .bind(&track.recipient)
        .bind(&track.subject)
        .bind(&track.notes)
        .bind(&track.message_group_id)
        .bind(track.pinned)
        .bind(track.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: TrackingId) -> RepoResult<Option<TrackedMessage>> {
        let result = sqlx::query_as::<_, TrackModel>(
            r#"
            SELECT id, recipient, subject, notes, message_group_id, pinned,
                   created_at, first_open_notified_at, follow_up_notified_at
            FROM tracked_messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TrackedMessage::from))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &TrackFilter,
        suppression: Duration,
    ) -> RepoResult<Vec<TrackOpenSummary>> {
        let limit = if filter.limit > 0 {
            filter.limit.min(MAX_LIST_LIMIT)
        } else {
            DEFAULT_LIST_LIMIT
        };

        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT t.id, t.recipient, t.subject, t.notes, t.message_group_id, t.pinned,
                   t.created_at, t.first_open_notified_at, t.follow_up_notified_at,
                   COUNT(o.id) AS total_opens,
                   COUNT(o.id) FILTER (
                       WHERE o.proxy IS NULL
                         AND o.opened_at >= t.created_at + make_interval(secs => "#,
        );
        qb.push_bind(suppression_secs(suppression));
        qb.push(
            r#")
                   ) AS genuine_opens,
                   MIN(o.opened_at) AS first_open_at,
                   MAX(o.opened_at) AS last_open_at
            FROM tracked_messages t
            LEFT JOIN open_events o ON o.tracked_message_id = t.id
            WHERE 1 = 1"#,
        );

        match filter.opened {
            Some(true) => {
                qb.push(
                    " AND EXISTS (SELECT 1 FROM open_events oe WHERE oe.tracked_message_id = t.id)",
                );
            }
            Some(false) => {
                qb.push(
                    " AND NOT EXISTS (SELECT 1 FROM open_events oe WHERE oe.tracked_message_id = t.id)",
                );
            }
            None => {}
        }

        if let Some(after) = filter.created_after {
            qb.push(" AND t.created_at >= ");
            qb.push_bind(after);
        }
        if let Some(before) = filter.created_before {
            qb.push(" AND t.created_at <= ");
            qb.push_bind(before);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (t.recipient ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR t.subject ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR t.notes ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb.push(" GROUP BY t.id ORDER BY t.pinned DESC, t.created_at DESC LIMIT ");
        qb.push_bind(limit);

        let rows = qb
            .build_query_as::<TrackSummaryModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TrackOpenSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn summarize(
        &self,
        id: TrackingId,
        suppression: Duration,
    ) -> RepoResult<Option<TrackOpenSummary>> {
        let result = sqlx::query_as::<_, TrackSummaryModel>(
            r#"
            SELECT t.id, t.recipient, t.subject, t.notes, t.message_group_id, t.pinned,
                   t.created_at, t.first_open_notified_at, t.follow_up_notified_at,
                   COUNT(o.id) AS total_opens,
                   COUNT(o.id) FILTER (
                       WHERE o.proxy IS NULL
                         AND o.opened_at >= t.created_at + make_interval(secs => $2)
                   ) AS genuine_opens,
                   MIN(o.opened_at) AS first_open_at,
                   MAX(o.opened_at) AS last_open_at
            FROM tracked_messages t
            LEFT JOIN open_events o ON o.tracked_message_id = t.id
            WHERE t.id = $1
            GROUP BY t.id
            "#,
        )
        .bind(id.into_inner())
        .bind(suppression_secs(suppression))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(TrackOpenSummary::from))
    }

    #[instrument(skip(self))]
    async fn update(&self, track: &TrackedMessage) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE tracked_messages
            SET pinned = $2, notes = $3
            WHERE id = $1
            "#,
        )
        .bind(track.id.into_inner())
        .bind(track.pinned)
        .bind(&track.notes)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(track_not_found(track.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TrackingId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM tracked_messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(track_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tracked_messages")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn recipient_rollups(&self, suppression: Duration) -> RepoResult<Vec<RecipientRollup>> {
        let rows = sqlx::query_as::<_, RecipientRollupModel>(
            r#"
            SELECT t.recipient, t.created_at,
                   COUNT(o.id) FILTER (
                       WHERE o.proxy IS NULL
                         AND o.opened_at >= t.created_at + make_interval(secs => $1)
                   ) AS genuine_opens,
                   MAX(o.opened_at) FILTER (
                       WHERE o.proxy IS NULL
                         AND o.opened_at >= t.created_at + make_interval(secs => $1)
                   ) AS last_genuine_open_at
            FROM tracked_messages t
            LEFT JOIN open_events o ON o.tracked_message_id = t.id
            WHERE t.recipient IS NOT NULL
            GROUP BY t.id
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RecipientRollup::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_first_open_pending(
        &self,
        suppression: Duration,
    ) -> RepoResult<Vec<TrackedMessage>> {
        let rows = sqlx::query_as::<_, TrackModel>(
            r#"
            SELECT t.id, t.recipient, t.subject, t.notes, t.message_group_id, t.pinned,
                   t.created_at, t.first_open_notified_at, t.follow_up_notified_at
            FROM tracked_messages t
            WHERE t.first_open_notified_at IS NULL
              AND EXISTS (
                  SELECT 1 FROM open_events o
                  WHERE o.tracked_message_id = t.id
                    AND o.proxy IS NULL
                    AND o.opened_at >= t.created_at + make_interval(secs => $1)
              )
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TrackedMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_follow_up_pending(
        &self,
        suppression: Duration,
        min_age: Duration,
    ) -> RepoResult<Vec<TrackedMessage>> {
        let cutoff: DateTime<Utc> = Utc::now() - min_age;

        let rows = sqlx::query_as::<_, TrackModel>(
            r#"
            SELECT t.id, t.recipient, t.subject, t.notes, t.message_group_id, t.pinned,
                   t.created_at, t.first_open_notified_at, t.follow_up_notified_at
            FROM tracked_messages t
            WHERE t.follow_up_notified_at IS NULL
              AND t.created_at <= $2
              AND NOT EXISTS (
                  SELECT 1 FROM open_events o
                  WHERE o.tracked_message_id = t.id
                    AND o.proxy IS NULL
                    AND o.opened_at >= t.created_at + make_interval(secs => $1)
              )
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(suppression_secs(suppression))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(TrackedMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn mark_first_open_notified(
        &self,
        id: TrackingId,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        // No-op when already marked; the timestamp is written at most once
        sqlx::query(
            r#"
            UPDATE tracked_messages
            SET first_open_notified_at = $2
            WHERE id = $1 AND first_open_notified_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_follow_up_notified(&self, id: TrackingId, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE tracked_messages
            SET follow_up_notified_at = $2
            WHERE id = $1 AND follow_up_notified_at IS NULL
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
