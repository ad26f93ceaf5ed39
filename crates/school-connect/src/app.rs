//! Mounts every resource group under `/api` next to the discovery document.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use crate::api::ApiState;
use crate::{academics, accounts, admissions, content, events, gallery, jobs, news, utils};

/// Groups listed by the discovery document, in mount order.
const GROUPS: [&str; 8] = [
    "accounts",
    "academics",
    "admissions",
    "content",
    "events",
    "gallery",
    "jobs",
    "news",
];

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api", get(discovery))
        .route("/api/", get(discovery))
        .nest("/api/accounts", accounts::router())
        .nest("/api/academics", academics::router())
        .nest("/api/admissions", admissions::router())
        .nest("/api/content", content::router())
        .nest("/api/events", events::router())
        .nest("/api/gallery", gallery::router())
        .nest("/api/jobs", jobs::router())
        .nest("/api/news", news::router())
        .nest("/api/utils", utils::router())
        .with_state(state)
}

async fn discovery(State(state): State<ApiState>, headers: HeaderMap) -> Json<Value> {
    let base = base_url(&headers);
    let endpoints: Map<String, Value> = GROUPS
        .iter()
        .map(|group| (group.to_string(), json!(format!("{base}/api/{group}/"))))
        .collect();
    Json(json!({
        "message": format!("Welcome to {} API", state.site.name),
        "version": "1.0",
        "endpoints": endpoints,
    }))
}

/// Scheme and authority the caller used to reach us.
fn base_url(headers: &HeaderMap) -> String {
    let header = |name: &'static str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };
    let scheme = header("x-forwarded-proto")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or("http");
    let host = header("host").unwrap_or("localhost");
    format!("{scheme}://{host}")
}
