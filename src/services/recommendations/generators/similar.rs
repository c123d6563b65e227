use super::{or_empty, CandidateGenerator, CycleContext};
use crate::{
    models::{Recommendation, WatchRecord, WatchStatus},
    services::recommendations::{
        dedup::is_already_known,
        format::{display_rating, format_recommendation, has_common_people},
    },
};

/// Minimum rating for a watched title to seed suggestions
const LIKED_THRESHOLD: f64 = 7.0;
const MAX_SOURCES: usize = 5;
const CANDIDATES_PER_SOURCE: usize = 2;
const SIMILAR_SCORE_FACTOR: f64 = 0.1;

/// Recommends titles the catalog associates with the user's best-rated ones.
///
/// Output is bounded by the per-source caps; `limit` is not applied.
#[derive(Debug, Default)]
pub struct SimilarContentGenerator;

/// Highest-rated liked records, best first. Equal ratings keep history order.
fn liked_sources(records: &[WatchRecord]) -> Vec<(&WatchRecord, f64)> {
    let mut liked: Vec<(&WatchRecord, f64)> = records
        .iter()
        .filter(|r| r.status == WatchStatus::Watched)
        .filter_map(|r| r.rating.map(|rating| (r, rating)))
        .filter(|(_, rating)| *rating >= LIKED_THRESHOLD)
        .collect();
    liked.sort_by(|a, b| b.1.total_cmp(&a.1));
    liked.truncate(MAX_SOURCES);
    liked
}

#[async_trait::async_trait]
impl CandidateGenerator for SimilarContentGenerator {
    async fn generate(&self, ctx: &CycleContext<'_>, _limit: usize) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for (source, rating) in liked_sources(ctx.records) {
            let Some(external_id) = source.external_id else {
                continue;
            };

            let similar = or_empty(
                ctx.catalog
                    .get_recommended_similar(external_id, source.kind)
                    .await,
                ctx.catalog,
                "get_recommended_similar",
            );

            for candidate in similar.iter().take(CANDIDATES_PER_SOURCE) {
                if is_already_known(candidate, ctx.records) {
                    continue;
                }

                let mut reason =
                    format!("You rated '{}' {}/10", source.title, display_rating(rating));
                if let (Some(ours), Some(theirs)) = (&source.director, &candidate.director) {
                    if has_common_people(ours, theirs) {
                        reason.push_str(" - same director");
                    }
                }

                recommendations.push(format_recommendation(
                    candidate,
                    reason,
                    rating * SIMILAR_SCORE_FACTOR,
                    ctx.image_base_url,
                ));
            }
        }

        recommendations
    }

    fn name(&self) -> &'static str {
        "similar"
    }
}
