//! Decides whether a catalog candidate is already on the user's list.

use crate::models::{CandidateContent, WatchRecord};

/// Titles scoring above this are treated as the same title
const TITLE_SIMILARITY_THRESHOLD: u8 = 85;

/// Length of the longest common subsequence of two char sequences
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Case-insensitive indel ratio of two titles on a 0–100 scale.
///
/// `2 * matching chars / (len a + len b)`, rounded half to even. Equal titles
/// score 100; an empty title against a non-empty one scores 0.
pub fn title_similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let matched = common_subsequence_len(&a, &b) as f64;
    let ratio = 2.0 * matched / (a.len() + b.len()) as f64;
    (ratio * 100.0).round_ties_even() as u8
}

/// True when the candidate matches any record, watched or queued.
///
/// A shared external id matches immediately regardless of title. Otherwise
/// the candidate matches a record whose title similarity exceeds 85, which
/// catches re-releases and punctuation variants.
pub fn is_already_known(candidate: &CandidateContent, records: &[WatchRecord]) -> bool {
    if let Some(id) = candidate.id {
        if records.iter().any(|r| r.external_id == Some(id)) {
            return true;
        }
    }

    let title = candidate.display_title();
    records
        .iter()
        .any(|r| title_similarity(title, &r.title) > TITLE_SIMILARITY_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{candidate, watched};

    #[test]
    fn test_shared_external_id_matches_despite_different_title() {
        let mut record = watched(1, "Completely Different", "Drama", Some(7.0));
        record.external_id = Some(603);

        assert!(is_already_known(&candidate(603, "The Matrix", vec![]), &[record]));
    }

    #[test]
    fn test_trailing_space_variant_matches() {
        let records = vec![watched(1, "The Matrix", "Action", Some(9.0))];
        assert!(title_similarity("The Matrix", "The Matrix ") > 85);
        assert!(is_already_known(&candidate(1, "The Matrix ", vec![]), &records));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let records = vec![watched(1, "the dark knight", "Action", Some(9.0))];
        assert_eq!(title_similarity("The Dark Knight", "the dark knight"), 100);
        assert!(is_already_known(&candidate(2, "The Dark Knight", vec![]), &records));
    }

    #[test]
    fn test_unrelated_titles_do_not_match() {
        let records = vec![watched(1, "Titanic", "Romance", Some(6.0))];
        assert_eq!(title_similarity("Inception", "Titanic"), 38);
        assert!(!is_already_known(&candidate(2, "Inception", vec![]), &records));
    }

    #[test]
    fn test_one_character_variants_match() {
        assert_eq!(title_similarity("Alien", "Aliens"), 91);
        assert_eq!(title_similarity("Heat", "Heat."), 89);

        let records = vec![watched(1, "Heat", "Crime", Some(9.0))];
        assert!(is_already_known(&candidate(2, "Heat.", vec![]), &records));

        let records = vec![watched(1, "Alien", "Horror", Some(8.0))];
        assert!(is_already_known(&candidate(2, "Aliens", vec![]), &records));
    }

    #[test]
    fn test_punctuation_variants_match() {
        let records = vec![watched(1, "Mission: Impossible", "Action", Some(7.0))];
        assert_eq!(title_similarity("Mission Impossible", "Mission: Impossible"), 97);
        assert!(is_already_known(&candidate(2, "Mission Impossible", vec![]), &records));

        let records = vec![watched(1, "Spider-Man", "Action", Some(7.0))];
        assert!(is_already_known(&candidate(2, "Spiderman", vec![]), &records));
    }

    #[test]
    fn test_threshold_is_strictly_above_85() {
        assert_eq!(title_similarity("The Terminator", "The Terminator 2049"), 85);
        let records = vec![watched(1, "The Terminator", "Action", Some(8.0))];
        assert!(!is_already_known(&candidate(2, "The Terminator 2049", vec![]), &records));

        assert_eq!(title_similarity("Gladiator", "Gladiator II"), 86);
        let records = vec![watched(1, "Gladiator", "Action", Some(8.0))];
        assert!(is_already_known(&candidate(2, "Gladiator II", vec![]), &records));
    }

    #[test]
    fn test_short_titles_with_extra_punctuation() {
        assert_eq!(title_similarity("Up", "Up!"), 80);
        let records = vec![watched(1, "Up", "Animation", Some(8.0))];
        assert!(!is_already_known(&candidate(2, "Up!", vec![]), &records));
    }

    #[test]
    fn test_empty_titles() {
        assert_eq!(title_similarity("", ""), 100);
        assert_eq!(title_similarity("Heat", ""), 0);
    }

    #[test]
    fn test_series_name_is_compared() {
        let records = vec![watched(1, "Breaking Bad", "Drama", Some(9.5))];
        let series = CandidateContent {
            id: Some(1396),
            name: Some("Breaking Bad".to_string()),
            ..Default::default()
        };
        assert!(is_already_known(&series, &records));
    }

    #[test]
    fn test_empty_history_knows_nothing() {
        assert!(!is_already_known(&candidate(1, "Heat", vec![]), &[]));
    }
}
