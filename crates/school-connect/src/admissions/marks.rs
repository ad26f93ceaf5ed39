//! Interview scoring: replace-all save and lookup of an application's marks.

use std::collections::HashSet;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::domain::{FormType, InterviewMark};
use crate::api::handlers::{param_id, required_param};
use crate::api::{ApiError, ApiState, Viewer};
use crate::store::{Record, RecordId, SchoolStore, StoreError};

#[derive(Debug, Deserialize)]
pub struct MarksSubmission {
    pub application_id: RecordId,
    pub application_type: FormType,
    #[serde(default)]
    pub marks: Vec<MarkEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MarkEntry {
    pub subject_name: String,
    pub marks_obtained: f64,
    pub max_marks: f64,
    #[serde(default)]
    pub display_order: Option<u32>,
}

/// Saved marks of one application, by display order.
pub fn marks_for(
    store: &SchoolStore,
    application: RecordId,
) -> Result<Vec<InterviewMark>, StoreError> {
    let mut marks = store
        .admissions
        .marks
        .select(|mark| mark.application_id == application)?;
    marks.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.subject_name.cmp(&b.subject_name))
    });
    Ok(marks)
}

fn application_exists(
    store: &SchoolStore,
    submission: &MarksSubmission,
) -> Result<bool, StoreError> {
    match submission.application_type {
        FormType::KgStd => store.admissions.kg_std.contains(submission.application_id),
        FormType::PlusOne => store.admissions.plus_one.contains(submission.application_id),
    }
}

/// Replace every mark of the application with the submitted set.
///
/// The whole set is validated before the old marks are removed. Removal and
/// insertion are separate steps.
pub fn save_marks(
    store: &SchoolStore,
    submission: MarksSubmission,
) -> Result<Vec<InterviewMark>, ApiError> {
    if !application_exists(store, &submission)? {
        return Err(ApiError::NotFound("Application not found".to_string()));
    }

    let now = Utc::now();
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(submission.marks.len());
    for (position, entry) in submission.marks.into_iter().enumerate() {
        let subject = entry.subject_name.trim().to_string();
        if !seen.insert(subject.to_lowercase()) {
            return Err(ApiError::invalid(
                "subject_name",
                format!("subject '{subject}' is listed more than once"),
            ));
        }
        let mut mark = InterviewMark {
            application_id: submission.application_id,
            application_type: submission.application_type,
            subject_name: subject,
            marks_obtained: entry.marks_obtained,
            max_marks: entry.max_marks,
            display_order: entry.display_order.unwrap_or(position as u32),
            ..InterviewMark::default()
        };
        mark.assign(Uuid::new_v4(), now);
        mark.validate()?;
        rows.push(mark);
    }

    let table = &store.admissions.marks;
    let removed = table.remove_where(|mark| mark.application_id == submission.application_id)?;
    for mark in rows {
        table.insert(mark)?;
    }
    info!(
        application = %submission.application_id,
        replaced = removed.len(),
        "interview marks saved"
    );
    Ok(marks_for(store, submission.application_id)?)
}

pub(super) async fn save_marks_handler(
    State(state): State<ApiState>,
    viewer: Viewer,
    body: Result<Json<MarksSubmission>, JsonRejection>,
) -> Result<Json<Vec<InterviewMark>>, ApiError> {
    viewer.require_staff()?;
    let Json(submission) = body?;
    Ok(Json(save_marks(&state.store, submission)?))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MarksQuery {
    application: Option<String>,
}

pub(super) async fn list_marks_handler(
    State(state): State<ApiState>,
    viewer: Viewer,
    query: Result<Query<MarksQuery>, QueryRejection>,
) -> Result<Json<Vec<InterviewMark>>, ApiError> {
    viewer.require_staff()?;
    let Query(query) = query?;
    let raw = required_param(query.application, "Application parameter required")?;
    let application = param_id(&raw, "application")?;
    Ok(Json(marks_for(&state.store, application)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admissions::{Gender, KgStdApplication};

    fn store_with_application() -> (SchoolStore, RecordId) {
        let store = SchoolStore::default();
        let mut application = KgStdApplication {
            application_number: "MHS2025-1001".into(),
            student_name: "Anu".into(),
            date_of_birth: "2019-06-01".parse().unwrap(),
            gender: Gender::Female,
            parent_name: "Rafeeq".into(),
            parent_email: "rafeeq@example.com".into(),
            parent_phone: "9876543210".into(),
            address: "Pottur".into(),
            grade_applying_for: "LKG".into(),
            ..KgStdApplication::default()
        };
        let id = Uuid::new_v4();
        application.assign(id, Utc::now());
        store.admissions.kg_std.insert(application).unwrap();
        (store, id)
    }

    fn entry(subject: &str, obtained: f64) -> MarkEntry {
        MarkEntry {
            subject_name: subject.into(),
            marks_obtained: obtained,
            max_marks: 25.0,
            display_order: None,
        }
    }

    fn submission(id: RecordId, marks: Vec<MarkEntry>) -> MarksSubmission {
        MarksSubmission {
            application_id: id,
            application_type: FormType::KgStd,
            marks,
        }
    }

    #[test]
    fn save_replaces_previous_marks() {
        let (store, id) = store_with_application();
        let first = vec![entry("Maths", 20.0), entry("English", 18.0)];
        save_marks(&store, submission(id, first)).unwrap();

        let saved = save_marks(&store, submission(id, vec![entry("Drawing", 22.0)])).unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].subject_name, "Drawing");
        assert_eq!(marks_for(&store, id).unwrap().len(), 1);
    }

    #[test]
    fn invalid_set_leaves_existing_marks_alone() {
        let (store, id) = store_with_application();
        save_marks(&store, submission(id, vec![entry("Maths", 20.0)])).unwrap();

        let over = save_marks(&store, submission(id, vec![entry("English", 30.0)]));
        assert!(matches!(over, Err(ApiError::Validation { field: Some("marks_obtained"), .. })));

        let repeated = vec![entry("Art", 1.0), entry("art ", 2.0)];
        let repeated = save_marks(&store, submission(id, repeated));
        assert!(matches!(repeated, Err(ApiError::Validation { field: Some("subject_name"), .. })));

        let kept = marks_for(&store, id).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].subject_name, "Maths");
    }

    #[test]
    fn wrong_application_type_is_not_found() {
        let (store, id) = store_with_application();
        let mut wrong = submission(id, vec![entry("Maths", 1.0)]);
        wrong.application_type = FormType::PlusOne;
        assert!(matches!(save_marks(&store, wrong), Err(ApiError::NotFound(_))));
    }
}
