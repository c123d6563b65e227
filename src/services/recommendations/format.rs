use std::collections::HashSet;

use crate::models::{CandidateContent, Recommendation};

/// Builds a recommendation from a catalog entry
pub fn format_recommendation(
    candidate: &CandidateContent,
    reason: String,
    score: f64,
    image_base_url: &str,
) -> Recommendation {
    let poster_url = candidate
        .poster_path
        .as_deref()
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}{}", image_base_url, path));

    Recommendation {
        title: candidate.display_title().to_string(),
        kind: candidate.kind(),
        reason,
        score,
        external_id: candidate.id,
        poster_url,
        overview: candidate.overview.clone().unwrap_or_default(),
        year: extract_year(candidate),
        rating: candidate.vote_average,
    }
}

/// Year from the first four characters of the release or first-air date
pub fn extract_year(candidate: &CandidateContent) -> Option<i32> {
    let date = candidate
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .or(candidate.first_air_date.as_deref())?;

    date.chars().take(4).collect::<String>().parse().ok()
}

/// True when two comma-separated name lists share a name, ignoring case
pub fn has_common_people(a: &str, b: &str) -> bool {
    let names = |people: &str| -> HashSet<String> {
        people
            .split(',')
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect()
    };

    !names(a).is_disjoint(&names(b))
}

/// Rating as shown in reasons: `8.0`, `7.5`, `9.25`
pub fn display_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}
