use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::MediaKind;

const MAX_DIRECTORS: usize = 3;
const MAX_CREATORS: usize = 3;
const MAX_MAIN_ACTORS: usize = 5;

/// Catalog genre id → genre name
pub type GenreMap = BTreeMap<u32, String>;

/// Media scope of a trending query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaScope {
    All,
    Movie,
    Tv,
}

impl MediaScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaScope::All => "all",
            MediaScope::Movie => "movie",
            MediaScope::Tv => "tv",
        }
    }
}

/// Time window of a trending query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

// ============================================================================
// TMDB list entries
// ============================================================================

/// A catalog entry as returned by search, discover, trending and
/// recommendation lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateContent {
    #[serde(default)]
    pub id: Option<i64>,
    /// Movie-style title field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Series-style title field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Comma-joined director or creator names, when the catalog supplies them
    #[serde(default)]
    pub director: Option<String>,
}

impl CandidateContent {
    /// The movie title if present, otherwise the series name
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Movie when the entry carries a movie-style title field
    pub fn kind(&self) -> MediaKind {
        if self.title.is_some() {
            MediaKind::Movie
        } else {
            MediaKind::Series
        }
    }
}

// ============================================================================
// TMDB detail payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creator {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// Crew members credited as "Director", at most three, comma-joined
    pub fn directors(&self) -> String {
        self.crew
            .iter()
            .filter(|person| person.job.as_deref() == Some("Director"))
            .take(MAX_DIRECTORS)
            .map(|person| person.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First five cast entries, comma-joined
    pub fn main_actors(&self) -> String {
        self.cast
            .iter()
            .take(MAX_MAIN_ACTORS)
            .map(|actor| actor.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Full movie or series details with credits appended
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub episode_run_time: Vec<i32>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl ContentDetails {
    /// Series creators, at most three, comma-joined
    pub fn creators(&self) -> String {
        self.created_by
            .iter()
            .take(MAX_CREATORS)
            .map(|creator| creator.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
