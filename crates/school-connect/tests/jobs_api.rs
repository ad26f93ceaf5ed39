//! Careers board: positions, applications and their scoping.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration, Utc};
use serde_json::{json, Value};

use common::{app, id_of, len_of, TestApp, NEIGHBOUR, PARENT, STAFF};

fn position(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Teach senior classes.",
        "requirements": "B.Ed",
        "responsibilities": "Lesson planning",
        "department": "Science",
        "location": "Pottur",
        "employment_type": "full_time",
        "experience_level": "mid",
    })
}

async fn create_position(app: &TestApp, payload: Value) -> Value {
    let (status, body) = app.post("/api/jobs/positions", Some(STAFF), payload).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

fn application(position: &str) -> Value {
    json!({
        "position": position,
        "first_name": "Rahul",
        "last_name": "Menon",
        "email": "rahul@mail.test",
        "phone_number": "9847000002",
        "address": "Calicut",
        "status": "submitted",
    })
}

async fn apply(app: &TestApp, token: &str, position: &str) -> Value {
    let (status, body) = app
        .post("/api/jobs/applications", Some(token), application(position))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn slugs_are_derived_and_deduplicated() {
    let app = app();
    let first = create_position(&app, position("Physics Teacher (Senior)")).await;
    let second = create_position(&app, position("Physics Teacher (Senior)")).await;

    assert_eq!(first["slug"], "physics-teacher-senior");
    assert_eq!(second["slug"], "physics-teacher-senior-2");
    assert_eq!(first["posted_by"], json!(app.staff_id));
    assert_eq!(first["salary_range"], "Salary not specified");
    assert_eq!(first["is_published"], false);

    let mut explicit = position("Chemistry Teacher");
    explicit["slug"] = json!("physics-teacher-senior");
    let (status, body) = app.post("/api/jobs/positions", Some(STAFF), explicit).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "slug");
}

#[tokio::test]
async fn salary_bounds_must_be_ordered() {
    let app = app();
    let mut payload = position("Accountant");
    payload["salary_min"] = json!(50000);
    payload["salary_max"] = json!(30000);

    let (status, body) = app.post("/api/jobs/positions", Some(STAFF), payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "salary_max");
}

#[tokio::test]
async fn published_positions_exclude_drafts_and_past_deadlines() {
    let app = app();
    let today = Utc::now().date_naive();

    let mut open = position("Librarian");
    open["status"] = json!("published");
    open["application_deadline"] = json!(today.to_string());
    open["salary_min"] = json!(30000);
    open["salary_max"] = json!(50000);
    let open = create_position(&app, open).await;
    assert_eq!(open["salary_range"], "USD 30,000 - 50,000");

    let mut no_deadline = position("Counsellor");
    no_deadline["status"] = json!("published");
    create_position(&app, no_deadline).await;

    let mut expired = position("Driver");
    expired["status"] = json!("published");
    expired["application_deadline"] = json!((today - Duration::days(1)).to_string());
    create_position(&app, expired).await;

    create_position(&app, position("Draft Role")).await;

    let (status, body) = app.get("/api/jobs/positions/published", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Librarian"]);
}

#[tokio::test]
async fn positions_by_type_requires_the_parameter() {
    let app = app();
    let mut contract = position("Sports Coach");
    contract["status"] = json!("published");
    contract["employment_type"] = json!("contract");
    create_position(&app, contract).await;
    let mut full_time = position("Clerk");
    full_time["status"] = json!("published");
    create_position(&app, full_time).await;

    let (status, body) = app.get("/api/jobs/positions/by_type", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Type parameter required");

    let (_, body) = app.get("/api/jobs/positions/by_type?type=contract", None).await;
    assert_eq!(len_of(&body), 1);
    assert_eq!(body[0]["title"], "Sports Coach");

    let (status, body) = app.get("/api/jobs/positions/by_type?type=volunteer", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len_of(&body), 0);
}

#[tokio::test]
async fn applications_track_the_position_count() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Music Teacher")).await);

    let created = apply(&app, PARENT, &position_id).await;
    let year = Utc::now().year();
    let number = created["application_number"].as_str().unwrap();
    assert!(number.starts_with(&format!("JOB{year}-")), "{number}");
    assert_eq!(created["applicant"], json!(app.parent_id));
    assert_eq!(created["full_name"], "Rahul Menon");
    assert_eq!(created["position_title"], "Music Teacher");
    assert_eq!(created["is_submitted"], true);
    assert!(created["submitted_at"].is_string());

    apply(&app, NEIGHBOUR, &position_id).await;
    let (_, stored) = app
        .get(&format!("/api/jobs/positions/{position_id}"), None)
        .await;
    assert_eq!(stored["applications_count"], 2);

    let (status, _) = app
        .delete(&format!("/api/jobs/applications/{}", id_of(&created)), Some(PARENT))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, stored) = app
        .get(&format!("/api/jobs/positions/{position_id}"), None)
        .await;
    assert_eq!(stored["applications_count"], 1);
}

#[tokio::test]
async fn one_application_per_position_and_applicant() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Art Teacher")).await);
    apply(&app, PARENT, &position_id).await;

    let (status, body) = app
        .post("/api/jobs/applications", Some(PARENT), application(&position_id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "position, applicant");
}

#[tokio::test]
async fn applicants_only_see_their_own_applications() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Lab Assistant")).await);
    let mine = apply(&app, PARENT, &position_id).await;
    apply(&app, NEIGHBOUR, &position_id).await;

    let (_, list) = app.get("/api/jobs/applications", Some(PARENT)).await;
    assert_eq!(len_of(&list), 1);
    let (_, list) = app.get("/api/jobs/applications", Some(STAFF)).await;
    assert_eq!(len_of(&list), 2);

    let (status, _) = app
        .get(&format!("/api/jobs/applications/{}", id_of(&mine)), Some(NEIGHBOUR))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/jobs/applications", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn application_actions_validate_parameters() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Nurse")).await);
    apply(&app, PARENT, &position_id).await;

    let (status, body) = app.get("/api/jobs/applications/by_status", Some(STAFF)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Status parameter required");

    let (_, body) = app
        .get("/api/jobs/applications/by_status?status=submitted", Some(STAFF))
        .await;
    assert_eq!(len_of(&body), 1);

    let (status, body) = app.get("/api/jobs/applications/by_position", Some(STAFF)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Position parameter required");

    let (status, _) = app
        .get("/api/jobs/applications/by_position?position=abc", Some(STAFF))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .get(
            &format!("/api/jobs/applications/by_position?position={position_id}"),
            Some(NEIGHBOUR),
        )
        .await;
    assert_eq!(len_of(&body), 0);
}

#[tokio::test]
async fn position_of_an_application_is_fixed() {
    let app = app();
    let first = id_of(&create_position(&app, position("Cook")).await);
    let second = id_of(&create_position(&app, position("Gardener")).await);
    let created = apply(&app, PARENT, &first).await;

    let (status, body) = app
        .patch(
            &format!("/api/jobs/applications/{}", id_of(&created)),
            Some(PARENT),
            json!({ "position": second }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "position");
}

#[tokio::test]
async fn documents_attach_only_to_own_applications() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Warden")).await);
    let application_id = id_of(&apply(&app, PARENT, &position_id).await);
    let document = json!({
        "application": application_id,
        "document_type": "resume",
        "title": "CV",
        "file_url": "https://files.test/cv.pdf",
        "file_size": 2048,
    });

    let (status, body) = app
        .post("/api/jobs/documents", Some(NEIGHBOUR), document.clone())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "application");

    let (status, _) = app.post("/api/jobs/documents", Some(PARENT), document).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, theirs) = app.get("/api/jobs/documents", Some(NEIGHBOUR)).await;
    assert_eq!(len_of(&theirs), 0);
    let (_, mine) = app.get("/api/jobs/documents", Some(PARENT)).await;
    assert_eq!(len_of(&mine), 1);
}

#[tokio::test]
async fn interviews_are_staff_managed_and_cascade_with_the_position() {
    let app = app();
    let position_id = id_of(&create_position(&app, position("Peon")).await);
    let application_id = id_of(&apply(&app, PARENT, &position_id).await);
    let interview = json!({
        "application": application_id,
        "interview_type": "in_person",
        "scheduled_date": "2030-01-15T10:00:00Z",
        "rating": 8,
    });

    let (status, _) = app
        .post("/api/jobs/interviews", Some(PARENT), interview.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app.post("/api/jobs/interviews", Some(STAFF), interview).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["duration_minutes"], 60);

    let (_, visible) = app.get("/api/jobs/interviews", Some(PARENT)).await;
    assert_eq!(len_of(&visible), 1);
    let (_, hidden) = app.get("/api/jobs/interviews", Some(NEIGHBOUR)).await;
    assert_eq!(len_of(&hidden), 0);

    let (status, _) = app
        .delete(&format!("/api/jobs/positions/{position_id}"), Some(STAFF))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let counts = app.store.row_counts().expect("counts");
    assert_eq!(counts["job_applications"], 0);
    assert_eq!(counts["job_interviews"], 0);
}

#[tokio::test]
async fn deleting_a_category_keeps_its_positions() {
    let app = app();
    let (status, category) = app
        .post(
            "/api/jobs/categories",
            Some(STAFF),
            json!({ "name": "Teaching" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["color"], "#8B5CF6");

    let mut payload = position("Hindi Teacher");
    payload["category"] = category["id"].clone();
    let created = create_position(&app, payload).await;
    assert_eq!(created["category_name"], "Teaching");

    app.delete(&format!("/api/jobs/categories/{}", id_of(&category)), Some(STAFF))
        .await;
    let (status, stored) = app
        .get(&format!("/api/jobs/positions/{}", id_of(&created)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stored["category"].is_null());
    assert!(stored["category_name"].is_null());
}
