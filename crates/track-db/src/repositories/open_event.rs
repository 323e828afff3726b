//! PostgreSQL implementation of OpenEventRepository

use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;
use tracing::instrument;

use track_core::entities::{NewOpenEvent, OpenEvent};
use track_core::traits::{HourBucket, OpenEventRepository, RepoResult, WeekdayBucket};
use track_core::value_objects::TrackingId;

use crate::mappers::OpenEventInsert;
use crate::models::{HourBucketModel, OpenEventModel, WeekdayBucketModel};

use super::error::{map_db_error, map_fk_violation, track_not_found};
use super::suppression_secs;

/// PostgreSQL implementation of OpenEventRepository
#[derive(Clone)]
pub struct PgOpenEventRepository {
    pool: PgPool,
}

impl PgOpenEventRepository {
    /// Create a new PgOpenEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OpenEventRepository for PgOpenEventRepository {
    #[instrument(skip(self, event), fields(track_id = %event.tracked_message_id))]
    async fn record(&self, event: &NewOpenEvent) -> RepoResult<OpenEvent> {
        let insert = OpenEventInsert::new(event);

        let row = sqlx::query_as::<_, OpenEventModel>(
            r#"
            INSERT INTO open_events
                (tracked_message_id, ip_address, user_agent, referer, country, city, proxy)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, tracked_message_id, opened_at, ip_address, user_agent,
                      referer, country, city, proxy
            "#,
        )
        .bind(insert.tracked_message_id)
        .bind(insert.ip_address)
        .bind(insert.user_agent)
        .bind(insert.referer)
        .bind(insert.country)
        .bind(insert.city)
        .bind(insert.proxy)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fk_violation(e, || track_not_found(event.tracked_message_id)))?;

        Ok(OpenEvent::from(row))
    }

    #[instrument(skip(self))]
    async fn find_by_track(&self, track_id: TrackingId) -> RepoResult<Vec<OpenEvent>> {
        let rows = sqlx::query_as::<_, OpenEventModel>(
            r#"
            SELECT id, tracked_message_id, opened_at, ip_address, user_agent,
                   referer, country, city, proxy
            FROM open_events
            WHERE tracked_message_id = $1
            ORDER BY opened_at DESC, id DESC
            "#,
        )
        .bind(track_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(OpenEvent::from).collect())
    }

    #[instrument(skip(self))]
    async fn first_genuine_open(
        &self,
        track_id: TrackingId,
        suppression: Duration,
    ) -> RepoResult<Option<OpenEvent>> {
        let row = sqlx::query_as::<_, OpenEventModel>(
            r#"
            SELECT o.id, o.tracked_message_id, o.opened_at, o.ip_address, o.user_agent,
                   o.referer, o.country, o.city, o.proxy
            FROM open_events o
            JOIN tracked_messages t ON t.id = o.tracked_message_id
            WHERE o.tracked_message_id = $1
              AND o.proxy IS NULL
              AND o.opened_at >= t.created_at + make_interval(secs => $2)
            ORDER BY o.opened_at ASC, o.id ASC
            LIMIT 1
            "#,
        )
        .bind(track_id.into_inner())
        .bind(suppression_secs(suppression))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(OpenEvent::from))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM open_events")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_genuine(&self, suppression: Duration) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM open_events o
            JOIN tracked_messages t ON t.id = o.tracked_message_id
            WHERE o.proxy IS NULL
              AND o.opened_at >= t.created_at + make_interval(secs => $1)
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_tracks_with_opens(&self) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT tracked_message_id) FROM open_events",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_tracks_with_genuine_opens(&self, suppression: Duration) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT o.tracked_message_id)
            FROM open_events o
            JOIN tracked_messages t ON t.id = o.tracked_message_id
            WHERE o.proxy IS NULL
              AND o.opened_at >= t.created_at + make_interval(secs => $1)
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn genuine_opens_by_hour(&self, suppression: Duration) -> RepoResult<Vec<HourBucket>> {
        // AT TIME ZONE pins the buckets to UTC regardless of the server setting
        let rows = sqlx::query_as::<_, HourBucketModel>(
            r#"
            SELECT CAST(date_part('hour', o.opened_at AT TIME ZONE 'UTC') AS INT4) AS hour,
                   COUNT(*) AS count
            FROM open_events o
            JOIN tracked_messages t ON t.id = o.tracked_message_id
            WHERE o.proxy IS NULL
              AND o.opened_at >= t.created_at + make_interval(secs => $1)
            GROUP BY hour
            ORDER BY hour
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|r| HourBucket { hour: r.hour, count: r.count })
            .collect())
    }

    #[instrument(skip(self))]
    async fn genuine_opens_by_weekday(
        &self,
        suppression: Duration,
    ) -> RepoResult<Vec<WeekdayBucket>> {
        // date_part('dow', ...) numbers days 0-6 starting at Sunday
        let rows = sqlx::query_as::<_, WeekdayBucketModel>(
            r#"
            SELECT CAST(date_part('dow', o.opened_at AT TIME ZONE 'UTC') AS INT4) AS weekday,
                   COUNT(*) AS count
            FROM open_events o
            JOIN tracked_messages t ON t.id = o.tracked_message_id
            WHERE o.proxy IS NULL
              AND o.opened_at >= t.created_at + make_interval(secs => $1)
            GROUP BY weekday
            ORDER BY weekday
            "#,
        )
        .bind(suppression_secs(suppression))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|r| WeekdayBucket { weekday: r.weekday, count: r.count })
            .collect())
    }
}
