use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::MediaKind;

/// Genre name → preference score, ordered by genre name
pub type GenreWeights = BTreeMap<String, f64>;

/// A single scored suggestion returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub kind: MediaKind,
    /// Human-readable explanation of why this was suggested
    pub reason: String,
    pub score: f64,
    pub external_id: Option<i64>,
    pub poster_url: Option<String>,
    pub overview: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
}
