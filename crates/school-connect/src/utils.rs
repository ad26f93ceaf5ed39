//! Application status lookup for parents and the document generation stubs.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::admissions::marks::marks_for;
use crate::admissions::FormType;
use crate::api::{ApiError, ApiState};
use crate::store::{RecordId, SchoolStore, StoreError};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/get-application-status", post(application_status))
        .route("/generate-application-pdf", post(not_implemented))
        .route("/generate-interview-letter", post(not_implemented))
        .route("/generate-mark-list", post(not_implemented))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(default)]
    pub application_number: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

/// An application found by number and parent phone.
#[derive(Debug)]
pub struct FoundApplication {
    pub id: RecordId,
    pub kind: FormType,
    pub record: Value,
}

/// Look the number up in the KG/STD table first, then in Plus One.
pub fn find_application(
    store: &SchoolStore,
    number: &str,
    phone: &str,
) -> Result<Option<FoundApplication>, ApiError> {
    let admissions = &store.admissions;
    if let Some(found) = admissions
        .kg_std
        .find(|row| row.application_number == number && row.parent_phone == phone)?
    {
        return Ok(Some(FoundApplication {
            id: found.id,
            kind: FormType::KgStd,
            record: serde_json::to_value(&found)?,
        }));
    }
    if let Some(found) = admissions
        .plus_one
        .find(|row| row.application_number == number && row.parent_phone == phone)?
    {
        return Ok(Some(FoundApplication {
            id: found.id,
            kind: FormType::PlusOne,
            record: serde_json::to_value(&found)?,
        }));
    }
    Ok(None)
}

fn without_nulls(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn academic_year(store: &SchoolStore, kind: FormType) -> Result<Option<String>, StoreError> {
    Ok(store
        .admissions
        .forms
        .find(|form| form.form_type == kind)?
        .map(|form| form.academic_year))
}

async fn application_status(
    State(state): State<ApiState>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body?;
    let number = request.application_number.as_deref().map(str::trim).unwrap_or_default();
    let phone = request.mobile_number.as_deref().map(str::trim).unwrap_or_default();
    if number.is_empty() || phone.is_empty() {
        return Err(ApiError::BadRequest(
            "Application number and mobile number are required".to_string(),
        ));
    }

    let Some(found) = find_application(&state.store, number, phone)? else {
        debug!(number, "application status lookup missed");
        return Err(ApiError::NotFound("Application not found".to_string()));
    };

    Ok(Json(json!({
        "application": without_nulls(found.record),
        "applicationType": found.kind.as_str(),
        "academicYear": academic_year(&state.store, found.kind)?,
        "interviewMarks": marks_for(&state.store, found.id)?,
    })))
}

async fn not_implemented() -> ApiError {
    ApiError::NotImplemented
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_are_dropped_from_the_application() {
        let cleaned = without_nulls(json!({
            "notes": null,
            "student_name": "Anu",
            "interview_date": null,
        }));
        assert_eq!(cleaned, json!({"student_name": "Anu"}));
    }
}
