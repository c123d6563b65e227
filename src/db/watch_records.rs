use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{NewWatchRecord, WatchRecord, WatchStatus},
};

/// Storage of the user's watched and want-to-watch titles
///
/// The recommendation engine only reads through this trait; every write is
/// initiated by an API caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchRepository: Send + Sync {
    /// All records, optionally filtered by status, most recently watched first
    async fn get_all_watch_records(&self, status: Option<WatchStatus>)
        -> AppResult<Vec<WatchRecord>>;

    /// Inserts a record and returns its id
    async fn add_watch_record(&self, record: NewWatchRecord) -> AppResult<i64>;

    /// Moves a record to `watched`, optionally setting its rating and date.
    /// Returns false when no record has this id.
    async fn mark_watched(
        &self,
        id: i64,
        rating: Option<f64>,
        watched_on: Option<NaiveDate>,
    ) -> AppResult<bool>;

    /// Returns false when no record has this id
    async fn delete_watch_record(&self, id: i64) -> AppResult<bool>;
}

#[derive(Debug, FromRow)]
struct WatchRecordRow {
    id: i64,
    title: String,
    kind: String,
    genre: Option<String>,
    language: Option<String>,
    rating: Option<f64>,
    platform: Option<String>,
    watched_on: Option<NaiveDate>,
    duration_minutes: Option<i32>,
    director: Option<String>,
    actors: Option<String>,
    year: Option<i32>,
    external_id: Option<i64>,
    poster_url: Option<String>,
    overview: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WatchRecordRow> for WatchRecord {
    type Error = AppError;

    fn try_from(row: WatchRecordRow) -> Result<Self, Self::Error> {
        Ok(WatchRecord {
            id: row.id,
            title: row.title,
            kind: row.kind.parse()?,
            genre: row.genre,
            language: row.language,
            rating: row.rating,
            platform: row.platform,
            watched_on: row.watched_on,
            duration_minutes: row.duration_minutes,
            director: row.director,
            actors: row.actors,
            year: row.year,
            external_id: row.external_id,
            poster_url: row.poster_url,
            overview: row.overview,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, title, kind, genre, language, rating, platform, watched_on,
           duration_minutes, director, actors, year, external_id, poster_url,
           overview, status, created_at
    FROM watch_records
"#;

/// Postgres-backed watch list
#[derive(Clone)]
pub struct PgWatchRepository {
    pool: PgPool,
}

impl PgWatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchRepository for PgWatchRepository {
    async fn get_all_watch_records(
        &self,
        status: Option<WatchStatus>,
    ) -> AppResult<Vec<WatchRecord>> {
        let sql = format!(
            "{} WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY watched_on DESC NULLS LAST, id DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, WatchRecordRow>(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        let total = rows.len();
        let records: Vec<WatchRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                WatchRecord::try_from(row)
                    .map_err(|e| {
                        tracing::warn!(record_id = id, error = %e, "Skipping malformed watch record");
                    })
                    .ok()
            })
            .collect();

        tracing::debug!(
            total,
            loaded = records.len(),
            status = ?status,
            "Loaded watch records"
        );

        Ok(records)
    }

    async fn add_watch_record(&self, record: NewWatchRecord) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO watch_records (
                title, kind, genre, language, rating, platform, watched_on,
                duration_minutes, director, actors, year, external_id, poster_url,
                overview, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(record.title.trim())
        .bind(record.kind.as_str())
        .bind(&record.genre)
        .bind(&record.language)
        .bind(record.rating)
        .bind(&record.platform)
        .bind(record.watched_on)
        .bind(record.duration_minutes)
        .bind(&record.director)
        .bind(&record.actors)
        .bind(record.year)
        .bind(record.external_id)
        .bind(&record.poster_url)
        .bind(&record.overview)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(record_id = id, title = %record.title, "Watch record added");

        Ok(id)
    }

    async fn mark_watched(
        &self,
        id: i64,
        rating: Option<f64>,
        watched_on: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE watch_records
            SET status = 'watched',
                rating = COALESCE($2, rating),
                watched_on = COALESCE($3, watched_on, CURRENT_DATE)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(rating)
        .bind(watched_on)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_watch_record(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watch_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
