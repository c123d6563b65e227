/// Movie/TV metadata catalog abstraction
///
/// The recommendation engine talks to the external catalog only through this
/// trait, so the TMDB client can be swapped for a fake in tests or for another
/// metadata source.
use crate::{
    error::AppResult,
    models::{CandidateContent, ContentDetails, GenreMap, MediaKind, MediaScope, TimeWindow},
};

pub mod tmdb;

/// Trait for external catalog providers
///
/// An unconfigured provider (no credentials) answers every call with an empty
/// result instead of an error. Transport and upstream failures are returned
/// as errors; callers that must not fail treat them as empty results.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Free-text search across movies and series
    async fn search_content(&self, query: &str) -> AppResult<Vec<CandidateContent>>;

    /// Full details with credits, `None` when the catalog has no such title
    async fn get_details(&self, id: i64, kind: MediaKind) -> AppResult<Option<ContentDetails>>;

    /// Titles the catalog recommends for viewers of the given title
    async fn get_recommended_similar(
        &self,
        id: i64,
        kind: MediaKind,
    ) -> AppResult<Vec<CandidateContent>>;

    async fn get_trending(
        &self,
        scope: MediaScope,
        window: TimeWindow,
    ) -> AppResult<Vec<CandidateContent>>;

    /// Popular titles of one kind, optionally restricted to genres and a year
    async fn get_discover(
        &self,
        kind: MediaKind,
        genre_ids: &[u32],
        year: Option<i32>,
    ) -> AppResult<Vec<CandidateContent>>;

    /// Genre id → name for movie and series genres combined
    async fn get_genre_mapping(&self) -> AppResult<GenreMap>;

    /// Whether the provider has credentials and will reach the network
    fn is_configured(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
