use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{lenient_rating, validate_rating, NewWatchRecord, WatchRecord, WatchStatus},
    services::watchlist::{compute_stats, WatchStats},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<WatchStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkWatchedRequest {
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub watched_on: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<WatchRecord>>> {
    let records = state.repository.get_all_watch_records(params.status).await?;
    Ok(Json(records))
}

pub async fn add(
    State(state): State<AppState>,
    Json(record): Json<NewWatchRecord>,
) -> AppResult<(StatusCode, Json<Value>)> {
    record.validate()?;
    let title = record.title.clone();
    let id = state.repository.add_watch_record(record).await?;

    tracing::info!(id, title = %title, "Added watch record");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Moves a queued title to watched
pub async fn mark_watched(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<MarkWatchedRequest>,
) -> AppResult<Json<Value>> {
    validate_rating(request.rating)?;

    if !state
        .repository
        .mark_watched(id, request.rating, request.watched_on)
        .await?
    {
        return Err(AppError::NotFound(format!("Watch record {}", id)));
    }

    Ok(Json(json!({ "id": id, "status": WatchStatus::Watched })))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if state.repository.delete_watch_record(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Watch record {}", id)))
    }
}

pub async fn stats(State(state): State<AppState>) -> AppResult<Json<WatchStats>> {
    let records = state.repository.get_all_watch_records(None).await?;
    Ok(Json(compute_stats(&records)))
}
