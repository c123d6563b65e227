//! Genre preference weights derived from watch history.

use std::collections::BTreeMap;

use crate::models::{GenreWeights, WatchRecord, WatchStatus};

const RATING_WEIGHT: f64 = 0.7;
const FREQUENCY_WEIGHT: f64 = 0.3;
/// Watch count at which the frequency term saturates
const FREQUENCY_SATURATION: f64 = 10.0;

/// Computes a preference score per genre from the watched, rated records.
///
/// Each comma-separated genre token of a record counts fully toward that
/// genre. For every genre:
///
/// `score = mean_rating * 0.7 + min(count / 10, 1) * 0.3`
///
/// Records without a rating or genre, and want-to-watch records, are ignored.
/// The result is a fresh map; nothing is carried over from earlier calls.
pub fn compute_preferences(records: &[WatchRecord]) -> GenreWeights {
    let mut ratings_by_genre: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for record in records.iter().filter(|r| r.status == WatchStatus::Watched) {
        let Some(rating) = record.rating else {
            continue;
        };
        for genre in record.genres() {
            ratings_by_genre.entry(genre).or_default().push(rating);
        }
    }

    ratings_by_genre
        .into_iter()
        .map(|(genre, ratings)| {
            let watch_count = ratings.len() as f64;
            let avg_rating = ratings.iter().sum::<f64>() / watch_count;
            let frequency = (watch_count / FREQUENCY_SATURATION).min(1.0);
            let score = avg_rating * RATING_WEIGHT + frequency * FREQUENCY_WEIGHT;
            (genre.to_string(), score)
        })
        .collect()
}

/// The `n` highest-weighted genres, highest first.
///
/// Equal weights keep the map's order, which is ascending genre name.
pub fn top_genres(weights: &GenreWeights, n: usize) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = weights
        .iter()
        .map(|(genre, weight)| (genre.as_str(), *weight))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}
