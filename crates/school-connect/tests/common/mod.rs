//! Shared harness: an in-memory store behind the full router, three callers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use school_connect::accounts::User;
use school_connect::api::ApiState;
use school_connect::app;
use school_connect::config::{Credential, SiteConfig};
use school_connect::store::{Record, SchoolStore};

pub const STAFF: &str = "staff-token";
pub const PARENT: &str = "parent-token";
pub const NEIGHBOUR: &str = "neighbour-token";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SchoolStore>,
    pub staff_id: Uuid,
    pub parent_id: Uuid,
    pub neighbour_id: Uuid,
}

pub fn app() -> TestApp {
    let store = Arc::new(SchoolStore::default());
    let staff_id = Uuid::new_v4();
    let parent_id = Uuid::new_v4();
    let neighbour_id = Uuid::new_v4();
    let credential = |token: &str, user_id, staff| Credential {
        token: token.to_string(),
        user_id,
        staff,
    };
    let state = ApiState::new(
        store.clone(),
        SiteConfig {
            name: "Modern School".to_string(),
        },
        vec![
            credential(STAFF, staff_id, true),
            credential(PARENT, parent_id, false),
            credential(NEIGHBOUR, neighbour_id, false),
        ],
    );

    TestApp {
        router: app::router(state),
        store,
        staff_id,
        parent_id,
        neighbour_id,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(payload) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&payload).expect("payload encodes"))
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).expect("request builds"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json payload")
        };
        (status, payload)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Store a user row under a caller's id so deletes and lookups find it.
    pub fn seed_user(&self, id: Uuid, username: &str) -> User {
        let mut user = User {
            email: format!("{username}@school.test"),
            username: username.to_string(),
            ..User::default()
        };
        user.assign(id, Utc::now());
        self.store
            .accounts
            .users
            .insert(user)
            .expect("user inserts")
    }
}

/// Id of a created row, as returned in its JSON representation.
pub fn id_of(payload: &Value) -> String {
    payload["id"]
        .as_str()
        .expect("payload carries an id")
        .to_string()
}

pub fn len_of(payload: &Value) -> usize {
    payload.as_array().map_or(0, Vec::len)
}
