use super::{or_empty, CandidateGenerator, CycleContext};
use crate::{
    models::{GenreMap, MediaKind, Recommendation},
    services::recommendations::{
        dedup::is_already_known, format::format_recommendation, preferences::top_genres,
    },
};

const TOP_GENRE_COUNT: usize = 3;
/// Discover results considered per genre, movies first then series
const CANDIDATES_PER_GENRE: usize = 3;
const GENRE_SCORE_FACTOR: f64 = 0.8;

/// Recommends popular titles from the user's three favourite genres.
///
/// The per-genre cap bounds the output; `limit` is not applied.
#[derive(Debug, Default)]
pub struct GenreGenerator;

/// Catalog id of a genre name, ignoring case; the lowest id wins on duplicates
fn resolve_genre_id(mapping: &GenreMap, genre: &str) -> Option<u32> {
    let genre = genre.to_lowercase();
    mapping
        .iter()
        .find(|(_, name)| name.to_lowercase() == genre)
        .map(|(id, _)| *id)
}

#[async_trait::async_trait]
impl CandidateGenerator for GenreGenerator {
    async fn generate(&self, ctx: &CycleContext<'_>, _limit: usize) -> Vec<Recommendation> {
        let top = top_genres(ctx.weights, TOP_GENRE_COUNT);
        if top.is_empty() {
            return Vec::new();
        }

        let catalog = ctx.catalog;
        let mapping = or_empty(catalog.get_genre_mapping().await, catalog, "get_genre_mapping");

        let mut recommendations = Vec::new();
        for (genre, weight) in top {
            let Some(genre_id) = resolve_genre_id(&mapping, genre) else {
                tracing::debug!(genre = %genre, "Genre has no catalog id, skipping");
                continue;
            };

            let movies = or_empty(
                catalog.get_discover(MediaKind::Movie, &[genre_id], None).await,
                catalog,
                "get_discover",
            );
            let series = or_empty(
                catalog.get_discover(MediaKind::Series, &[genre_id], None).await,
                catalog,
                "get_discover",
            );

            for candidate in movies.iter().chain(series.iter()).take(CANDIDATES_PER_GENRE) {
                if is_already_known(candidate, ctx.records) {
                    continue;
                }
                recommendations.push(format_recommendation(
                    candidate,
                    format!("You enjoy {} content (avg rating: {:.1})", genre, weight),
                    weight * GENRE_SCORE_FACTOR,
                    ctx.image_base_url,
                ));
            }
        }

        recommendations
    }

    fn name(&self) -> &'static str {
        "genre"
    }
}
