use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ContentDetails, MediaKind, NewWatchRecord, WatchRecord, WatchStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Viewing statistics over the watched records
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchStats {
    /// Most frequent genre string, `None` without any genre data
    pub top_genre: Option<String>,
    pub total_hours: f64,
    pub total_watched: usize,
    /// Mean rating, 0 when nothing is rated
    pub avg_rating: f64,
    /// Count per genre string, most frequent first
    pub genre_distribution: Vec<GenreCount>,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregates the watched records. Genres are grouped by the stored string,
/// so "Action, Drama" is its own bucket.
pub fn compute_stats(records: &[WatchRecord]) -> WatchStats {
    let watched: Vec<&WatchRecord> = records
        .iter()
        .filter(|r| r.status == WatchStatus::Watched)
        .collect();

    let total_minutes: i64 = watched
        .iter()
        .filter_map(|r| r.duration_minutes)
        .map(i64::from)
        .sum();

    let ratings: Vec<f64> = watched.iter().filter_map(|r| r.rating).collect();
    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        round_one_decimal(ratings.iter().sum::<f64>() / ratings.len() as f64)
    };

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for genre in watched.iter().filter_map(|r| r.genre.as_deref()) {
        *counts.entry(genre).or_default() += 1;
    }
    let mut genre_distribution: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    // Stable, so equal counts stay in name order
    genre_distribution.sort_by(|a, b| b.count.cmp(&a.count));

    WatchStats {
        top_genre: genre_distribution.first().map(|g| g.genre.clone()),
        total_hours: round_one_decimal(total_minutes as f64 / 60.0),
        total_watched: watched.len(),
        avg_rating,
        genre_distribution,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Pre-fills a watch record from catalog details.
///
/// Movies take their directors from the crew; series use their creators.
/// The result is watched and unrated, ready for the caller to adjust.
pub fn draft_from_details(
    details: &ContentDetails,
    kind: MediaKind,
    image_base_url: &str,
) -> NewWatchRecord {
    let title = match kind {
        MediaKind::Movie => details.title.as_deref().or(details.name.as_deref()),
        MediaKind::Series => details.name.as_deref().or(details.title.as_deref()),
    }
    .unwrap_or_default();

    let date = match kind {
        MediaKind::Movie => details.release_date.as_deref(),
        MediaKind::Series => details.first_air_date.as_deref(),
    };
    let year = date
        .and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok());

    let duration_minutes = match kind {
        MediaKind::Movie => details.runtime,
        MediaKind::Series => details.episode_run_time.first().copied(),
    };

    let director = match kind {
        MediaKind::Movie => details.credits.directors(),
        MediaKind::Series => details.creators(),
    };

    let genres = details
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut draft = NewWatchRecord::new(title, kind);
    draft.genre = non_empty(genres);
    draft.language = details.original_language.clone();
    draft.year = year;
    draft.duration_minutes = duration_minutes.filter(|d| *d > 0);
    draft.director = non_empty(director);
    draft.actors = non_empty(details.credits.main_actors());
    draft.external_id = Some(details.id);
    draft.poster_url = details
        .poster_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", image_base_url, p));
    draft.overview = details.overview.clone();
    draft
}
