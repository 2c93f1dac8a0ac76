//! In-process HTTP fixtures shared by the catalog, proxy and browse tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

pub type Captured = Arc<Mutex<Vec<Value>>>;

#[derive(Clone)]
struct FakeUpstream {
    status: StatusCode,
    body: String,
    requests: Captured,
}

async fn upstream_handler(
    State(upstream): State<FakeUpstream>,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    upstream.requests.lock().unwrap().push(body);
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body.clone(),
    )
}

/// Serve a canned GraphQL endpoint. Returns its URL and the request bodies it
/// has received.
pub async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> (String, Captured) {
    let requests: Captured = Arc::new(Mutex::new(Vec::new()));
    let upstream = FakeUpstream {
        status,
        body: body.into(),
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/graphql", post(upstream_handler))
        .with_state(upstream);
    let addr = spawn_app(app).await;
    (format!("http://{addr}/graphql"), requests)
}

pub fn media_json(id: i64, romaji: &str) -> Value {
    json!({
        "id": id,
        "siteUrl": format!("https://anilist.co/manga/{id}"),
        "isAdult": false,
        "title": { "english": null, "romaji": romaji, "native": null },
        "coverImage": { "large": "https://img/large.jpg", "medium": "https://img/medium.jpg" },
        "description": "<i>Test</i> description",
        "averageScore": 80,
        "popularity": 1000 + id,
        "genres": ["Action", "Comedy"],
        "format": "MANGA",
        "status": "FINISHED",
        "startDate": { "year": 2001, "month": 4, "day": 1 }
    })
}

pub fn envelope(media: Vec<Value>) -> String {
    json!({ "data": { "Page": { "media": media } } }).to_string()
}
