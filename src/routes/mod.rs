use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::WatchRepository,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{providers::CatalogProvider, recommendations::RecommendationEngine},
};

pub mod recommendations;
pub mod titles;
pub mod watchlist;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn WatchRepository>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub engine: Arc<RecommendationEngine>,
    pub image_base_url: String,
    /// Recommendation count when the request gives no `limit`
    pub default_limit: usize,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn WatchRepository>,
        catalog: Arc<dyn CatalogProvider>,
        image_base_url: impl Into<String>,
        default_limit: usize,
    ) -> Self {
        let image_base_url = image_base_url.into();
        let engine = RecommendationEngine::new(
            repository.clone(),
            catalog.clone(),
            image_base_url.clone(),
        );

        Self {
            repository,
            catalog,
            engine: Arc::new(engine),
            image_base_url,
            default_limit,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/preferences", get(recommendations::preferences))
        .route("/titles/search", get(titles::search))
        .route("/titles/:kind/:id", get(titles::details))
        .route("/watchlist", get(watchlist::list).post(watchlist::add))
        .route("/watchlist/stats", get(watchlist::stats))
        .route("/watchlist/:id/watched", post(watchlist::mark_watched))
        .route("/watchlist/:id", axum::routing::delete(watchlist::remove))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_configured": state.catalog.is_configured(),
        })),
    )
}
