use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

const MIN_TITLE_LENGTH: usize = 1;
const MAX_TITLE_LENGTH: usize = 200;
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2030;
const MIN_DURATION: i32 = 1;
const MAX_DURATION: i32 = 1000;
const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

/// Movie or TV series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }

    /// Path segment the catalog uses for this kind
    pub fn catalog_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            other => Err(AppError::InvalidInput(format!("Unknown media kind '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    Watched,
    WantToWatch,
}

impl WatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Watched => "watched",
            WatchStatus::WantToWatch => "want_to_watch",
        }
    }
}

impl FromStr for WatchStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watched" => Ok(WatchStatus::Watched),
            "want_to_watch" => Ok(WatchStatus::WantToWatch),
            other => Err(AppError::InvalidInput(format!("Unknown watch status '{}'", other))),
        }
    }
}

/// A movie or series in the user's history or queue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchRecord {
    pub id: i64,
    pub title: String,
    pub kind: MediaKind,
    /// Comma-joined genre names, e.g. "Action, Drama"
    pub genre: Option<String>,
    pub language: Option<String>,
    pub rating: Option<f64>,
    pub platform: Option<String>,
    pub watched_on: Option<NaiveDate>,
    pub duration_minutes: Option<i32>,
    /// Comma-joined director (movies) or creator (series) names
    pub director: Option<String>,
    pub actors: Option<String>,
    pub year: Option<i32>,
    /// TMDB identifier
    pub external_id: Option<i64>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
    pub status: WatchStatus,
    pub created_at: DateTime<Utc>,
}

impl WatchRecord {
    /// Genre tokens of this record, trimmed, empty tokens dropped
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }
}

/// Writable fields of a watch record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWatchRecord {
    pub title: String,
    pub kind: MediaKind,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub watched_on: Option<NaiveDate>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default = "default_status")]
    pub status: WatchStatus,
}

fn default_status() -> WatchStatus {
    WatchStatus::Watched
}

impl NewWatchRecord {
    pub fn new(title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            title: title.into(),
            kind,
            genre: None,
            language: None,
            rating: None,
            platform: None,
            watched_on: None,
            duration_minutes: None,
            director: None,
            actors: None,
            year: None,
            external_id: None,
            poster_url: None,
            overview: None,
            status: WatchStatus::Watched,
        }
    }

    /// Checks field ranges before the record reaches storage
    pub fn validate(&self) -> AppResult<()> {
        let title_length = self.title.trim().chars().count();
        if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&title_length) {
            return Err(AppError::InvalidInput(format!(
                "Title must be between {} and {} characters",
                MIN_TITLE_LENGTH, MAX_TITLE_LENGTH
            )));
        }

        if let Some(year) = self.year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(AppError::InvalidInput(format!(
                    "Year must be between {} and {}",
                    MIN_YEAR, MAX_YEAR
                )));
            }
        }

        if let Some(duration) = self.duration_minutes {
            if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
                return Err(AppError::InvalidInput(format!(
                    "Duration must be between {} and {} minutes",
                    MIN_DURATION, MAX_DURATION
                )));
            }
        }

        validate_rating(self.rating)
    }
}

pub fn validate_rating(rating: Option<f64>) -> AppResult<()> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(AppError::InvalidInput(
            format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
        )),
        _ => Ok(()),
    }
}

/// Accepts a rating as a number or a numeric string.
///
/// Anything that does not parse as a number becomes `None` instead of failing
/// the whole record.
pub fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
