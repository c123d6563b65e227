//! Recommendation engine
//!
//! One cycle snapshots the watch history, derives genre weights from it and
//! runs the three candidate generators over that fixed view. The merged list
//! is deduplicated by title, ranked by score and cut to the requested size.
//! The engine only reads; adding a suggestion to the watch list is up to the
//! caller.

use std::{collections::HashSet, sync::Arc};

use crate::{
    db::WatchRepository,
    models::{GenreWeights, Recommendation, WatchRecord},
    services::providers::CatalogProvider,
};

pub mod dedup;
pub mod format;
pub mod generators;
pub mod preferences;

use dedup::is_already_known;
use format::format_recommendation;
use generators::{
    or_empty, CandidateGenerator, CycleContext, GenreGenerator, SimilarContentGenerator,
    TrendingGenerator,
};
use preferences::compute_preferences;

/// Number of generators sharing the requested limit
const GENERATOR_SHARES: usize = 3;
/// Converts a catalog vote average (0-10) into a search result score
const SEARCH_SCORE_SCALE: f64 = 10.0;

pub struct RecommendationEngine {
    repository: Arc<dyn WatchRepository>,
    catalog: Arc<dyn CatalogProvider>,
    image_base_url: String,
    generators: Vec<Box<dyn CandidateGenerator>>,
}

impl RecommendationEngine {
    /// Engine running the genre, similar-content and trending generators, in that order
    pub fn new(
        repository: Arc<dyn WatchRepository>,
        catalog: Arc<dyn CatalogProvider>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            catalog,
            image_base_url: image_base_url.into(),
            generators: vec![
                Box::new(GenreGenerator),
                Box::new(SimilarContentGenerator),
                Box::new(TrendingGenerator),
            ],
        }
    }

    /// Ranked recommendations, at most `limit` of them.
    ///
    /// Never fails: a storage error is treated as an empty history and
    /// catalog errors as empty candidate lists.
    #[tracing::instrument(skip(self))]
    pub async fn get_recommendations(&self, limit: usize) -> Vec<Recommendation> {
        let records = self.snapshot().await;
        self.recommend(&records, limit).await
    }

    /// Current genre weights, recomputed from storage
    pub async fn preferences(&self) -> GenreWeights {
        compute_preferences(&self.snapshot().await)
    }

    /// Catalog search results the user has not already seen or queued
    #[tracing::instrument(skip(self))]
    pub async fn suggestions_by_title(&self, query: &str, limit: usize) -> Vec<Recommendation> {
        let records = self.snapshot().await;
        let catalog = self.catalog.as_ref();
        let results = or_empty(catalog.search_content(query).await, catalog, "search_content");

        results
            .iter()
            .take(limit)
            .filter(|candidate| !is_already_known(candidate, &records))
            .map(|candidate| {
                let score = candidate.vote_average.unwrap_or_default() / SEARCH_SCORE_SCALE;
                format_recommendation(
                    candidate,
                    "Search result".to_string(),
                    score,
                    &self.image_base_url,
                )
            })
            .collect()
    }

    async fn snapshot(&self) -> Vec<WatchRecord> {
        match self.repository.get_all_watch_records(None).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load watch history, recommending from an empty one");
                Vec::new()
            }
        }
    }

    /// Runs one cycle over an existing snapshot.
    ///
    /// Each generator is asked for `limit / 3`; the remainder of the division
    /// is never requested, so `limit = 10` asks for three apiece before the
    /// final cut.
    async fn recommend(&self, records: &[WatchRecord], limit: usize) -> Vec<Recommendation> {
        let weights = compute_preferences(records);
        let ctx = CycleContext {
            records,
            weights: &weights,
            catalog: self.catalog.as_ref(),
            image_base_url: &self.image_base_url,
        };
        let share = limit / GENERATOR_SHARES;

        let mut pool = Vec::new();
        for generator in &self.generators {
            let batch = generator.generate(&ctx, share).await;
            tracing::debug!(
                generator = generator.name(),
                candidates = batch.len(),
                "Generator finished"
            );
            pool.extend(batch);
        }

        let mut seen = HashSet::new();
        let mut ranked: Vec<Recommendation> = pool
            .into_iter()
            .filter(|rec| seen.insert(rec.title.clone()))
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(limit);

        tracing::info!(
            history = records.len(),
            genres = weights.len(),
            returned = ranked.len(),
            "Recommendation cycle complete"
        );
        ranked
    }
}
