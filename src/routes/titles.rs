use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::{AppError, AppResult},
    models::{MediaKind, NewWatchRecord, Recommendation},
    services::watchlist::draft_from_details,
};

const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<usize>,
}

/// Catalog search, leaving out titles already on the watch list
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Search query must not be empty".to_string()));
    }

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Ok(Json(state.engine.suggestions_by_title(query, limit).await))
}

/// Catalog details as a pre-filled watch record
pub async fn details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<NewWatchRecord>> {
    let kind: MediaKind = kind.parse()?;
    let details = state
        .catalog
        .get_details(id, kind)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No {} with id {}", kind, id)))?;

    Ok(Json(draft_from_details(&details, kind, &state.image_base_url)))
}
