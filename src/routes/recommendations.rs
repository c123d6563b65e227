use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::models::{GenreWeights, Recommendation};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> Json<Vec<Recommendation>> {
    let limit = params.limit.unwrap_or(state.default_limit);
    Json(state.engine.get_recommendations(limit).await)
}

/// Genre weights derived from the current watch history
pub async fn preferences(State(state): State<AppState>) -> Json<GenreWeights> {
    Json(state.engine.preferences().await)
}
