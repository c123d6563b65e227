use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use watchwise_api::{
    db::WatchRepository,
    error::AppResult,
    models::{
        CandidateContent, ContentDetails, Credits, CrewMember, Genre, GenreMap, MediaKind,
        MediaScope, NewWatchRecord, TimeWindow, WatchRecord, WatchStatus,
    },
    routes::{create_router, AppState},
    services::providers::CatalogProvider,
};

const IMAGE_BASE: &str = "https://img.test";

#[derive(Default)]
struct InMemoryRepository {
    records: Mutex<Vec<WatchRecord>>,
}

#[async_trait::async_trait]
impl WatchRepository for InMemoryRepository {
    async fn get_all_watch_records(
        &self,
        status: Option<WatchStatus>,
    ) -> AppResult<Vec<WatchRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }

    async fn add_watch_record(&self, record: NewWatchRecord) -> AppResult<i64> {
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(WatchRecord {
            id,
            title: record.title,
            kind: record.kind,
            genre: record.genre,
            language: record.language,
            rating: record.rating,
            platform: record.platform,
            watched_on: record.watched_on,
            duration_minutes: record.duration_minutes,
            director: record.director,
            actors: record.actors,
            year: record.year,
            external_id: record.external_id,
            poster_url: record.poster_url,
            overview: record.overview,
            status: record.status,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn mark_watched(
        &self,
        id: i64,
        rating: Option<f64>,
        watched_on: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        record.status = WatchStatus::Watched;
        if rating.is_some() {
            record.rating = rating;
        }
        if watched_on.is_some() {
            record.watched_on = watched_on;
        }
        Ok(true)
    }

    async fn delete_watch_record(&self, id: i64) -> AppResult<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

/// Fixed catalog: one action movie per list, details for The Matrix only
struct FakeCatalog {
    configured: bool,
}

fn movie(id: i64, title: &str, genre_ids: Vec<u32>, vote: f64) -> CandidateContent {
    CandidateContent {
        id: Some(id),
        title: Some(title.to_string()),
        genre_ids,
        release_date: Some("2014-10-24".to_string()),
        poster_path: Some(format!("/{}.jpg", id)),
        vote_average: Some(vote),
        ..Default::default()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search_content(&self, query: &str) -> AppResult<Vec<CandidateContent>> {
        if !self.configured {
            return Ok(Vec::new());
        }
        Ok(vec![
            movie(245891, "John Wick", vec![28], 7.4),
            movie(324552, &format!("{} Chapter 2", query), vec![28], 7.2),
        ])
    }

    async fn get_details(&self, id: i64, kind: MediaKind) -> AppResult<Option<ContentDetails>> {
        if !self.configured || id != 603 || kind != MediaKind::Movie {
            return Ok(None);
        }
        Ok(Some(ContentDetails {
            id: 603,
            title: Some("The Matrix".to_string()),
            genres: vec![Genre { id: 28, name: "Action".to_string() }],
            release_date: Some("1999-03-30".to_string()),
            runtime: Some(136),
            credits: Credits {
                cast: vec![],
                crew: vec![CrewMember {
                    name: "Lana Wachowski".to_string(),
                    job: Some("Director".to_string()),
                }],
            },
            ..Default::default()
        }))
    }

    async fn get_recommended_similar(
        &self,
        _id: i64,
        _kind: MediaKind,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.configured {
            return Ok(Vec::new());
        }
        Ok(vec![movie(9802, "The Rock", vec![28], 6.9)])
    }

    async fn get_trending(
        &self,
        _scope: MediaScope,
        _window: TimeWindow,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.configured {
            return Ok(Vec::new());
        }
        Ok(vec![
            movie(603692, "John Wick: Chapter 4", vec![28], 7.7),
            movie(313369, "La La Land", vec![10402], 7.9),
        ])
    }

    async fn get_discover(
        &self,
        _kind: MediaKind,
        _genre_ids: &[u32],
        _year: Option<i32>,
    ) -> AppResult<Vec<CandidateContent>> {
        if !self.configured {
            return Ok(Vec::new());
        }
        Ok(vec![movie(1573, "Die Hard 2", vec![28], 6.9)])
    }

    async fn get_genre_mapping(&self) -> AppResult<GenreMap> {
        if !self.configured {
            return Ok(GenreMap::new());
        }
        Ok([(28, "Action".to_string()), (10402, "Music".to_string())]
            .into_iter()
            .collect())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn create_test_server(configured: bool) -> TestServer {
    let state = AppState::new(
        Arc::new(InMemoryRepository::default()),
        Arc::new(FakeCatalog { configured }),
        IMAGE_BASE,
        10,
    );
    TestServer::new(create_router(state)).unwrap()
}

async fn add_record(server: &TestServer, body: Value) -> i64 {
    let response = server.post("/api/v1/watchlist").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_check_reports_catalog_state() {
    let server = create_test_server(false);
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog_configured"], false);
}

#[tokio::test]
async fn test_responses_carry_a_request_id() {
    let server = create_test_server(false);
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_add_and_list_watch_records() {
    let server = create_test_server(false);

    let id = add_record(
        &server,
        json!({ "title": "Heat", "kind": "movie", "genre": "Action, Crime", "rating": "9" }),
    )
    .await;
    add_record(
        &server,
        json!({ "title": "Dune: Part Two", "kind": "movie", "status": "want_to_watch" }),
    )
    .await;

    let all: Vec<Value> = server.get("/api/v1/watchlist").await.json();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], id);
    assert_eq!(all[0]["rating"], 9.0);

    let queued: Vec<Value> = server
        .get("/api/v1/watchlist")
        .add_query_param("status", "want_to_watch")
        .await
        .json();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0]["title"], "Dune: Part Two");
}

#[tokio::test]
async fn test_invalid_record_is_rejected() {
    let server = create_test_server(false);
    let response = server
        .post("/api/v1/watchlist")
        .json(&json!({ "title": "Heat", "kind": "movie", "rating": 12 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_mark_watched_and_delete() {
    let server = create_test_server(false);
    let id = add_record(
        &server,
        json!({ "title": "Arrival", "kind": "movie", "status": "want_to_watch" }),
    )
    .await;

    server
        .post(&format!("/api/v1/watchlist/{}/watched", id))
        .json(&json!({ "rating": 8.5, "watched_on": "2024-05-01" }))
        .await
        .assert_status_ok();

    let records: Vec<Value> = server.get("/api/v1/watchlist").await.json();
    assert_eq!(records[0]["status"], "watched");
    assert_eq!(records[0]["rating"], 8.5);
    assert_eq!(records[0]["watched_on"], "2024-05-01");

    server
        .delete(&format!("/api/v1/watchlist/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/api/v1/watchlist/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/api/v1/watchlist/99/watched")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watch_stats() {
    let server = create_test_server(false);
    add_record(
        &server,
        json!({ "title": "Heat", "kind": "movie", "genre": "Action", "rating": 8, "duration_minutes": 120 }),
    )
    .await;
    add_record(
        &server,
        json!({ "title": "Ronin", "kind": "movie", "genre": "Action", "rating": 7, "duration_minutes": 60 }),
    )
    .await;

    let stats: Value = server.get("/api/v1/watchlist/stats").await.json();
    assert_eq!(stats["total_watched"], 2);
    assert_eq!(stats["total_hours"], 3.0);
    assert_eq!(stats["avg_rating"], 7.5);
    assert_eq!(stats["top_genre"], "Action");
}

#[tokio::test]
async fn test_preferences_endpoint() {
    let server = create_test_server(false);
    add_record(
        &server,
        json!({ "title": "Heat", "kind": "movie", "genre": "Action,Thriller", "rating": 8 }),
    )
    .await;
    add_record(
        &server,
        json!({ "title": "Superbad", "kind": "movie", "genre": "Comedy", "rating": 7.5 }),
    )
    .await;

    let weights: Value = server.get("/api/v1/preferences").await.json();
    let weights = weights.as_object().unwrap();
    assert_eq!(weights.len(), 3);
    assert_eq!(weights["Action"], weights["Thriller"]);
    assert!(weights["Comedy"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_recommendations_without_history_or_catalog_are_empty() {
    let server = create_test_server(false);
    let response = server.get("/api/v1/recommendations").await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());
}

#[tokio::test]
async fn test_recommendations_are_ranked_and_bounded() {
    let server = create_test_server(true);
    add_record(
        &server,
        json!({
            "title": "Speed",
            "kind": "movie",
            "genre": "Action",
            "rating": 9,
            "external_id": 1637
        }),
    )
    .await;

    let recs: Vec<Value> = server
        .get("/api/v1/recommendations")
        .add_query_param("limit", 9)
        .await
        .json();

    assert!(!recs.is_empty() && recs.len() <= 9);
    let scores: Vec<f64> = recs.iter().map(|r| r["score"].as_f64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let titles: Vec<&str> = recs.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert!(titles.contains(&"John Wick: Chapter 4"));
    assert!(titles.contains(&"Die Hard 2"));
    assert!(titles.contains(&"The Rock"));
    assert!(!titles.contains(&"La La Land"));
}

#[tokio::test]
async fn test_search_rejects_blank_query() {
    let server = create_test_server(true);
    server
        .get("/api/v1/titles/search")
        .add_query_param("q", "   ")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_leaves_out_known_titles() {
    let server = create_test_server(true);
    add_record(
        &server,
        json!({ "title": "John Wick", "kind": "movie", "external_id": 245891 }),
    )
    .await;

    let results: Vec<Value> = server
        .get("/api/v1/titles/search")
        .add_query_param("q", "Wick")
        .await
        .json();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Wick Chapter 2");
    assert_eq!(results[0]["reason"], "Search result");
    assert_eq!(results[0]["poster_url"], "https://img.test/324552.jpg");
}

#[tokio::test]
async fn test_title_details_as_draft_record() {
    let server = create_test_server(true);

    let draft: Value = server.get("/api/v1/titles/movie/603").await.json();
    assert_eq!(draft["title"], "The Matrix");
    assert_eq!(draft["genre"], "Action");
    assert_eq!(draft["year"], 1999);
    assert_eq!(draft["duration_minutes"], 136);
    assert_eq!(draft["director"], "Lana Wachowski");
    assert_eq!(draft["external_id"], 603);

    server
        .get("/api/v1/titles/movie/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/v1/titles/podcast/603")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
