//! Catalog client against a throwaway HTTP server.

use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use streamverse_catalog::{CatalogClient, CatalogConfig, CatalogError};

async fn spawn_catalog() -> String {
    let app = Router::new()
        .route(
            "/movie/popular",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                // Requests without the key are rejected like the real API.
                if q.get("api_key").map(String::as_str) != Some("test-key") {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!({"page": 1, "results": [
                    {"id": 1, "title": "One", "poster_path": "/1.jpg"},
                    {"id": 2, "title": "Two"}
                ]})))
            }),
        )
        .route("/movie/top_rated", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/search/movie",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let query = q.get("query").cloned().unwrap_or_default();
                Json(json!({"results": [{"id": 9, "title": query}]}))
            }),
        )
        .route(
            "/movie/550",
            get(|| async {
                Json(json!({
                    "id": 550, "title": "Fight Club",
                    "genres": [{"id": 18, "name": "Drama"}],
                    "videos": {"results": [
                        {"key": "teaser", "site": "YouTube", "type": "Teaser"},
                        {"key": "trailer", "site": "YouTube", "type": "Trailer"}
                    ]},
                    "credits": {"cast": (0..15).map(|i| json!({"id": i, "name": format!("Actor {i}")})).collect::<Vec<Value>>()}
                }))
            }),
        )
        .route(
            "/movie/550/similar",
            get(|| async {
                Json(json!({"results": [{"id": 550, "title": "Self"}, {"id": 10, "title": "Ten"}]}))
            }),
        )
        .route("/discover/movie", get(|| async { StatusCode::BAD_GATEWAY }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: String) -> CatalogClient {
    CatalogClient::new(CatalogConfig {
        base_url,
        api_key: "test-key".into(),
        timeout: Duration::from_secs(5),
        ..CatalogConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn popular_sends_api_key() {
    let catalog = client(spawn_catalog().await);
    let popular = catalog.popular().await.unwrap();
    assert_eq!(popular.len(), 2);
    assert_eq!(popular[0].poster_path.as_deref(), Some("/1.jpg"));
}

#[tokio::test]
async fn server_error_is_reported_with_endpoint() {
    let catalog = client(spawn_catalog().await);
    match catalog.top_rated().await {
        Err(CatalogError::Status { status, endpoint }) => {
            assert_eq!(status, 500);
            assert_eq!(endpoint, "/movie/top_rated");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn search_forwards_query() {
    let catalog = client(spawn_catalog().await);
    let found = catalog.search("  heat ").await.unwrap();
    assert_eq!(found[0].title, "heat");
}

#[tokio::test]
async fn title_page_degrades_failed_related_listing() {
    let catalog = client(spawn_catalog().await);
    let page = catalog.title_page(550).await.unwrap();

    assert_eq!(page.trailer.as_ref().map(|v| v.key.as_str()), Some("trailer"));
    assert_eq!(page.cast.len(), 10);
    // Genre discovery failed; similar titles survive without the title itself.
    assert_eq!(page.related.iter().map(|m| m.id).collect::<Vec<_>>(), vec![10]);
    assert_eq!(
        page.trailer_embed_url().as_deref(),
        Some("https://www.youtube.com/embed/trailer?autoplay=1")
    );
}
