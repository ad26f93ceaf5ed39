use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::access::{Action, Viewer};
use super::resource::Resource;
use super::{ApiError, ApiState};
use crate::store::{Record, RecordId, SchoolStore, StoreError};

/// List/detail routes for one resource, relative to its group prefix.
pub fn resource_routes<R: Resource>() -> Router<ApiState> {
    Router::new()
        .route(&format!("/{}", R::PATH), get(list::<R>).post(create::<R>))
        .route(
            &format!("/{}/:id", R::PATH),
            get(retrieve::<R>)
                .put(replace::<R>)
                .patch(patch::<R>)
                .delete(destroy::<R>),
        )
}

async fn list<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<R::Filter>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    R::ACCESS.authorize(Action::List, &viewer)?;
    let Query(filter) = query?;
    let rows = collect::<R>(&state.store, &viewer, |row| R::matches(row, &filter))?;
    Ok(Json(rows))
}

async fn retrieve<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    R::ACCESS.authorize(Action::Retrieve, &viewer)?;
    let record = load_visible::<R>(&state.store, &viewer, &id)?;
    Ok(Json(R::present(&state.store, &record)?))
}

async fn create<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    R::ACCESS.authorize(Action::Create, &viewer)?;
    let Json(payload) = body?;
    let mut record: R::Record = decode(payload)?;
    record.assign(Uuid::new_v4(), Utc::now());
    let stored = insert_new::<R>(&state.store, record, &viewer)?;
    Ok((StatusCode::CREATED, Json(R::present(&state.store, &stored)?)))
}

async fn replace<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    update::<R>(&state.store, &viewer, &id, payload, false)
}

async fn patch<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = body?;
    update::<R>(&state.store, &viewer, &id, payload, true)
}

async fn destroy<R: Resource>(
    State(state): State<ApiState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    R::ACCESS.authorize(Action::Destroy, &viewer)?;
    let record = load_visible::<R>(&state.store, &viewer, &id)?;
    if let Some(removed) = R::table(&state.store).remove(record.id())? {
        R::on_delete(&state.store, &removed)?;
        info!(resource = R::PATH, id = %removed.id(), "row deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

fn update<R: Resource>(
    store: &SchoolStore,
    viewer: &Viewer,
    id: &str,
    payload: Value,
    partial: bool,
) -> Result<Json<Value>, ApiError> {
    R::ACCESS.authorize(Action::Update, viewer)?;
    let stored = load_visible::<R>(store, viewer, id)?;
    let payload = if partial {
        merge(serde_json::to_value(&stored)?, payload)?
    } else {
        payload
    };

    let mut record: R::Record = decode(payload)?;
    record.carry_over(&stored, Utc::now());
    R::prepare(store, &mut record, Some(&stored), viewer)?;
    R::check_references(store, &record)?;
    let saved = R::table(store).replace(record)?;
    info!(resource = R::PATH, id = %saved.id(), "row updated");
    Ok(Json(R::present(store, &saved)?))
}

/// Run the create pipeline for an already stamped record.
pub fn insert_new<R: Resource>(
    store: &SchoolStore,
    mut record: R::Record,
    viewer: &Viewer,
) -> Result<R::Record, ApiError> {
    R::prepare(store, &mut record, None, viewer)?;
    R::check_references(store, &record)?;
    let stored = R::table(store).insert(record)?;
    R::after_create(store, &stored)?;
    info!(resource = R::PATH, id = %stored.id(), "row created");
    Ok(stored)
}

/// Decode a client payload, ignoring the fields the server owns.
pub fn decode<T: Record>(payload: Value) -> Result<T, ApiError> {
    let Value::Object(mut fields) = payload else {
        return Err(ApiError::BadRequest("Expected a JSON object.".to_string()));
    };
    for key in T::READ_ONLY {
        fields.remove(*key);
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ApiError::BadRequest(err.to_string()))
}

fn merge(current: Value, patch: Value) -> Result<Value, ApiError> {
    match (current, patch) {
        (Value::Object(mut current), Value::Object(patch)) => {
            current.extend(patch);
            Ok(Value::Object(current))
        }
        _ => Err(ApiError::BadRequest("Expected a JSON object.".to_string())),
    }
}

/// Rows of `R` passing `keep` and the resource's visibility, ordered and
/// presented.
pub fn collect<R: Resource>(
    store: &SchoolStore,
    viewer: &Viewer,
    keep: impl Fn(&R::Record) -> bool,
) -> Result<Vec<Value>, ApiError> {
    let mut rows = Vec::new();
    for row in R::table(store).all()? {
        if keep(&row) && R::visible(store, &row, viewer)? {
            rows.push(row);
        }
    }
    rows.sort_by(R::ordering);
    rows.iter().map(|row| R::present(store, row)).collect()
}

/// Fetch a row by its path id. Malformed ids and hidden rows are not found.
pub fn load_visible<R: Resource>(
    store: &SchoolStore,
    viewer: &Viewer,
    raw_id: &str,
) -> Result<R::Record, ApiError> {
    let id = Uuid::parse_str(raw_id).map_err(|_| ApiError::not_found())?;
    let record = R::table(store).get(id)?.ok_or_else(ApiError::not_found)?;
    if !R::visible(store, &record, viewer)? {
        return Err(ApiError::not_found());
    }
    Ok(record)
}

/// Delete every `R` row matching `predicate`, running each one's own cascade.
pub fn cascade<R: Resource>(
    store: &SchoolStore,
    predicate: impl Fn(&R::Record) -> bool,
) -> Result<usize, StoreError> {
    let removed = R::table(store).remove_where(predicate)?;
    for row in &removed {
        R::on_delete(store, row)?;
    }
    Ok(removed.len())
}

/// A query parameter custom actions cannot do without; blank counts as missing.
pub fn required_param(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

/// Parse an id passed as a query parameter.
pub fn param_id(raw: &str, field: &'static str) -> Result<RecordId, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::invalid(field, format!("'{raw}' is not a valid UUID.")))
}

/// Parse a choice value (`"under_review"`) the way record payloads are parsed.
pub fn parse_choice<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(Value::String(raw.to_string())).ok()
}
