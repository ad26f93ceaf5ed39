//! Admission intake, interview marks and the parent-facing status lookup.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use serde_json::{json, Value};

use common::{app, id_of, len_of, TestApp, PARENT, STAFF};

fn kg_application() -> Value {
    json!({
        "student_name": "Anu Thomas",
        "date_of_birth": "2019-04-12",
        "gender": "female",
        "parent_name": "Thomas K",
        "parent_email": "thomas@family.test",
        "parent_phone": "9847000001",
        "address": "Pottur, Kerala",
        "grade_applying_for": "LKG",
    })
}

async fn submit_kg(app: &TestApp) -> Value {
    let (status, body) = app
        .post("/api/admissions/kg-std-applications", None, kg_application())
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn anonymous_submission_gets_an_application_number() {
    let app = app();
    let body = submit_kg(&app).await;

    let number = body["application_number"].as_str().expect("number assigned");
    let prefix = format!("MHS{}-", Utc::now().year());
    assert!(number.starts_with(&prefix), "{number}");
    assert_eq!(number.len(), prefix.len() + 4);
    assert_eq!(body["application_status"], "pending");
}

#[tokio::test]
async fn client_cannot_choose_the_application_number() {
    let app = app();
    let mut payload = kg_application();
    payload["application_number"] = json!("MHS1999-0001");

    let (status, body) = app
        .post("/api/admissions/kg-std-applications", None, payload)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["application_number"], "MHS1999-0001");
}

#[tokio::test]
async fn only_signed_in_callers_read_applications() {
    let app = app();
    let created = submit_kg(&app).await;

    let (status, body) = app.get("/api/admissions/kg-std-applications", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    let (status, list) = app
        .get("/api/admissions/kg-std-applications", Some(STAFF))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len_of(&list), 1);
    assert_eq!(list[0]["id"], created["id"]);
}

#[tokio::test]
async fn admission_forms_are_readable_by_anyone_but_written_by_members() {
    let app = app();
    let form = json!({ "form_type": "kg_std", "academic_year": "2025-2026" });

    let (status, _) = app.post("/api/admissions/forms", None, form.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/admissions/forms", Some(STAFF), form.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/admissions/forms", Some(STAFF), form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "form_type");

    let (status, list) = app.get("/api/admissions/forms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len_of(&list), 1);
}

fn marks_payload(application: &str, marks: Value) -> Value {
    json!({
        "application_id": application,
        "application_type": "kg_std",
        "marks": marks,
    })
}

#[tokio::test]
async fn saving_marks_replaces_the_previous_set() {
    let app = app();
    let application = id_of(&submit_kg(&app).await);

    let first = marks_payload(
        &application,
        json!([
            { "subject_name": "English", "marks_obtained": 18, "max_marks": 25 },
            { "subject_name": "Maths", "marks_obtained": 22, "max_marks": 25 },
        ]),
    );
    let (status, saved) = app
        .post("/api/admissions/interview-subjects/save_marks", Some(STAFF), first)
        .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(len_of(&saved), 2);
    assert_eq!(saved[0]["subject_name"], "English");

    let second = marks_payload(
        &application,
        json!([{ "subject_name": "General Awareness", "marks_obtained": 9, "max_marks": 10 }]),
    );
    app.post("/api/admissions/interview-subjects/save_marks", Some(STAFF), second)
        .await;

    let (status, listed) = app
        .get(
            &format!("/api/admissions/interview-subjects/marks?application={application}"),
            Some(STAFF),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len_of(&listed), 1);
    assert_eq!(listed[0]["subject_name"], "General Awareness");
}

#[tokio::test]
async fn invalid_marks_leave_the_saved_set_untouched() {
    let app = app();
    let application = id_of(&submit_kg(&app).await);
    let valid = marks_payload(
        &application,
        json!([{ "subject_name": "English", "marks_obtained": 18, "max_marks": 25 }]),
    );
    app.post("/api/admissions/interview-subjects/save_marks", Some(STAFF), valid)
        .await;

    let duplicated = marks_payload(
        &application,
        json!([
            { "subject_name": "Maths", "marks_obtained": 10, "max_marks": 25 },
            { "subject_name": "maths", "marks_obtained": 12, "max_marks": 25 },
        ]),
    );
    let (status, body) = app
        .post("/api/admissions/interview-subjects/save_marks", Some(STAFF), duplicated)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "subject_name");

    let over = marks_payload(
        &application,
        json!([{ "subject_name": "Maths", "marks_obtained": 30, "max_marks": 25 }]),
    );
    let (status, _) = app
        .post("/api/admissions/interview-subjects/save_marks", Some(STAFF), over)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let counts = app.store.row_counts().expect("counts");
    assert_eq!(counts["interview_marks"], 1);
}

#[tokio::test]
async fn marks_require_staff_and_a_known_application() {
    let app = app();
    let application = id_of(&submit_kg(&app).await);
    let payload = marks_payload(&application, json!([]));

    let (status, _) = app
        .post("/api/admissions/interview-subjects/save_marks", Some(PARENT), payload.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut wrong_stream = payload;
    wrong_stream["application_type"] = json!("plus_one");
    let (status, body) = app
        .post("/api/admissions/interview-subjects/save_marks", Some(STAFF), wrong_stream)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Application not found");
}

#[tokio::test]
async fn status_lookup_returns_application_and_marks() {
    let app = app();
    app.post(
        "/api/admissions/forms",
        Some(STAFF),
        json!({ "form_type": "kg_std", "academic_year": "2025-2026" }),
    )
    .await;
    let created = submit_kg(&app).await;
    let application = id_of(&created);
    app.post(
        "/api/admissions/interview-subjects/save_marks",
        Some(STAFF),
        marks_payload(
            &application,
            json!([{ "subject_name": "Drawing", "marks_obtained": 8, "max_marks": 10 }]),
        ),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/utils/get-application-status",
            None,
            json!({
                "applicationNumber": created["application_number"],
                "mobileNumber": "9847000001",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["applicationType"], "kg_std");
    assert_eq!(body["academicYear"], "2025-2026");
    assert_eq!(body["application"]["student_name"], "Anu Thomas");
    assert!(body["application"].get("notes").is_none());
    assert_eq!(len_of(&body["interviewMarks"]), 1);
}

#[tokio::test]
async fn status_lookup_validates_its_input() {
    let app = app();
    let created = submit_kg(&app).await;

    let (status, body) = app
        .post(
            "/api/utils/get-application-status",
            None,
            json!({ "applicationNumber": created["application_number"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Application number and mobile number are required");

    let (status, body) = app
        .post(
            "/api/utils/get-application-status",
            None,
            json!({
                "applicationNumber": created["application_number"],
                "mobileNumber": "0000000000",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Application not found");
}

#[tokio::test]
async fn document_generation_is_not_implemented() {
    let app = app();
    for path in [
        "/api/utils/generate-application-pdf",
        "/api/utils/generate-interview-letter",
        "/api/utils/generate-mark-list",
    ] {
        let (status, _) = app.post(path, None, json!({})).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "{path}");
    }
}

#[tokio::test]
async fn deleting_an_application_drops_its_marks() {
    let app = app();
    let application = id_of(&submit_kg(&app).await);
    app.post(
        "/api/admissions/interview-subjects/save_marks",
        Some(STAFF),
        marks_payload(
            &application,
            json!([{ "subject_name": "Reading", "marks_obtained": 5, "max_marks": 10 }]),
        ),
    )
    .await;

    let (status, _) = app
        .delete(
            &format!("/api/admissions/kg-std-applications/{application}"),
            Some(STAFF),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.row_counts().expect("counts")["interview_marks"], 0);
}
