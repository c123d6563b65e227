use super::{or_empty, CandidateGenerator, CycleContext};
use crate::{
    models::{CandidateContent, GenreMap, GenreWeights, MediaScope, Recommendation, TimeWindow},
    services::recommendations::{dedup::is_already_known, format::format_recommendation},
};

const TRENDING_SCORE_FACTOR: f64 = 0.6;
const TRENDING_BONUS: f64 = 0.3;
const MAX_REASON_GENRES: usize = 2;

/// Recommends this week's trending titles that overlap the user's genres.
///
/// Candidates sharing no genre with the preferences are dropped, so an empty
/// history yields nothing. Output is truncated to `limit`.
#[derive(Debug, Default)]
pub struct TrendingGenerator;

/// Sum of preference weights over the candidate's genres, with the matched
/// names in the candidate's genre order
fn genre_overlap<'a>(
    candidate: &CandidateContent,
    mapping: &'a GenreMap,
    weights: &GenreWeights,
) -> (f64, Vec<&'a str>) {
    let mut score = 0.0;
    let mut matched = Vec::new();

    for genre_id in &candidate.genre_ids {
        let Some(name) = mapping.get(genre_id) else {
            continue;
        };
        if let Some(weight) = weights.get(name) {
            score += weight;
            matched.push(name.as_str());
        }
    }

    (score, matched)
}

#[async_trait::async_trait]
impl CandidateGenerator for TrendingGenerator {
    async fn generate(&self, ctx: &CycleContext<'_>, limit: usize) -> Vec<Recommendation> {
        let catalog = ctx.catalog;
        let trending = or_empty(
            catalog.get_trending(MediaScope::All, TimeWindow::Week).await,
            catalog,
            "get_trending",
        );
        if trending.is_empty() {
            return Vec::new();
        }

        let mapping = or_empty(catalog.get_genre_mapping().await, catalog, "get_genre_mapping");

        let mut recommendations = Vec::new();
        for candidate in &trending {
            if is_already_known(candidate, ctx.records) {
                continue;
            }

            let (overlap, matched) = genre_overlap(candidate, &mapping, ctx.weights);
            if overlap <= 0.0 {
                continue;
            }

            let mut reason = "Trending this week".to_string();
            if !matched.is_empty() {
                let names: Vec<&str> = matched.into_iter().take(MAX_REASON_GENRES).collect();
                reason.push_str(&format!(" - matches your interest in {}", names.join(", ")));
            }

            recommendations.push(format_recommendation(
                candidate,
                reason,
                overlap * TRENDING_SCORE_FACTOR + TRENDING_BONUS,
                ctx.image_base_url,
            ));
        }

        recommendations.truncate(limit);
        recommendations
    }

    fn name(&self) -> &'static str {
        "trending"
    }
}
