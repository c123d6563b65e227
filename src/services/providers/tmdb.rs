/// TMDB (The Movie Database) catalog provider
///
/// Serves search, details with credits, per-title recommendations, trending,
/// discover and the genre list. Every response is cached in Redis.
///
/// API Flow:
/// 1. Search: /search/multi → movies, series and people in one list
/// 2. Details: /{movie|tv}/{id}?append_to_response=credits
/// 3. Similar: /{movie|tv}/{id}/recommendations
/// 4. Trending: /trending/{all|movie|tv}/{day|week}
/// 5. Discover: /discover/{movie|tv}?sort_by=popularity.desc
/// 6. Genres: /genre/movie/list and /genre/tv/list, merged
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CandidateContent, ContentDetails, Genre, GenreMap, MediaKind, MediaScope, TimeWindow,
    },
    services::providers::CatalogProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week
const SIMILAR_CACHE_TTL: u64 = 86400; // 1 day
const TRENDING_CACHE_TTL: u64 = 3600; // 1 hour
const DISCOVER_CACHE_TTL: u64 = 21600; // 6 hours
const GENRE_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Debug, Deserialize)]
struct PagedResults<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    language: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: Option<String>, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            cache,
        }
    }

    /// Sends an authenticated GET and decodes the JSON body.
    ///
    /// Returns `Ok(None)` on 404 so detail lookups can report a missing title.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_deref().unwrap_or_default()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(Some(response.json().await?))
    }

    /// Fetches a paged list endpoint and returns the first page of results
    async fn get_results(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<Vec<CandidateContent>> {
        let page: Option<PagedResults<CandidateContent>> = self.get_json(path, params).await?;
        let results = page.map(|p| p.results).unwrap_or_default();

        tracing::debug!(
            path = %path,
            results = results.len(),
            provider = "tmdb",
            "Catalog list fetched"
        );

        Ok(results)
    }

    async fn get_genre_list(&self, kind: MediaKind) -> AppResult<Vec<Genre>> {
        let path = format!("/genre/{}/list", kind.catalog_path());
        let list: Option<GenreList> = self.get_json(&path, &[]).await?;
        Ok(list.map(|l| l.genres).unwrap_or_default())
    }
}

/// Query parameters for a discover request
fn discover_params(kind: MediaKind, genre_ids: &[u32], year: Option<i32>) -> Vec<(&'static str, String)> {
    let mut params = vec![("sort_by", "popularity.desc".to_string())];

    if !genre_ids.is_empty() {
        let genres = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        params.push(("with_genres", genres));
    }

    if let Some(year) = year {
        let field = match kind {
            MediaKind::Movie => "year",
            MediaKind::Series => "first_air_date_year",
        };
        params.push((field, year.to_string()));
    }

    params
}

/// Merges movie and series genre lists; a series genre replaces a movie genre
/// with the same id
fn merge_genres(movie_genres: Vec<Genre>, tv_genres: Vec<Genre>) -> GenreMap {
    movie_genres
        .into_iter()
        .chain(tv_genres)
        .map(|genre| (genre.id, genre.name))
        .collect()
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_content(&self, query: &str) -> AppResult<Vec<CandidateContent>> {
        if !self.is_configured() || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        cached!(
            self.cache,
            CacheKey::Search(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let results = self
                    .get_results("/search/multi", &[("query", query.trim().to_string())])
                    .await?;

                tracing::info!(
                    query = %query,
                    results = results.len(),
                    provider = "tmdb",
                    "Title search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    async fn get_details(&self, id: i64, kind: MediaKind) -> AppResult<Option<ContentDetails>> {
        if !self.is_configured() {
            return Ok(None);
        }

        cached!(
            self.cache,
            CacheKey::Details(kind, id),
            DETAILS_CACHE_TTL,
            async move {
                let path = format!("/{}/{}", kind.catalog_path(), id);
                let details: Option<ContentDetails> = self
                    .get_json(&path, &[("append_to_response", "credits".to_string())])
                    .await?;

                tracing::info!(
                    external_id = id,
                    kind = %kind,
                    found = details.is_some(),
                    provider = "tmdb",
                    "Details fetched"
                );

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn get_recommended_similar(
        &self,
        id: i64,
        kind: MediaKind,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }

        cached!(
            self.cache,
            CacheKey::Similar(kind, id),
            SIMILAR_CACHE_TTL,
            async move {
                let path = format!("/{}/{}/recommendations", kind.catalog_path(), id);
                self.get_results(&path, &[]).await
            }
        )
    }

    async fn get_trending(
        &self,
        scope: MediaScope,
        window: TimeWindow,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }

        cached!(
            self.cache,
            CacheKey::Trending(scope, window),
            TRENDING_CACHE_TTL,
            async move {
                let path = format!("/trending/{}/{}", scope.as_str(), window.as_str());
                self.get_results(&path, &[]).await
            }
        )
    }

    async fn get_discover(
        &self,
        kind: MediaKind,
        genre_ids: &[u32],
        year: Option<i32>,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.is_configured() {
            return Ok(Vec::new());
        }

        cached!(
            self.cache,
            CacheKey::Discover {
                kind,
                genre_ids: genre_ids.to_vec(),
                year,
            },
            DISCOVER_CACHE_TTL,
            async move {
                let path = format!("/discover/{}", kind.catalog_path());
                self.get_results(&path, &discover_params(kind, genre_ids, year))
                    .await
            }
        )
    }

    async fn get_genre_mapping(&self) -> AppResult<GenreMap> {
        if !self.is_configured() {
            return Ok(GenreMap::new());
        }

        cached!(
            self.cache,
            CacheKey::GenreMapping,
            GENRE_CACHE_TTL,
            async move {
                let movie_genres = self.get_genre_list(MediaKind::Movie).await?;
                let tv_genres = self.get_genre_list(MediaKind::Series).await?;
                let mapping = merge_genres(movie_genres, tv_genres);

                tracing::info!(genres = mapping.len(), provider = "tmdb", "Genre mapping loaded");

                Ok::<_, AppError>(mapping)
            }
        )
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
