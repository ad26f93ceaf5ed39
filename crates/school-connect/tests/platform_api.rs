//! Caller resolution, accounts, site content and the discovery document.

mod common;

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;
use tower::ServiceExt;

use common::{app, id_of, len_of, NEIGHBOUR, PARENT, STAFF};

#[tokio::test]
async fn discovery_lists_groups_with_absolute_urls() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/")
        .header(header::HOST, "school.test")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["message"], "Welcome to Modern School API");
    assert_eq!(body["version"], "1.0");
    assert_eq!(body["endpoints"]["jobs"], "https://school.test/api/jobs/");
    assert_eq!(body["endpoints"].as_object().unwrap().len(), 8);

    let (status, _) = app.get("/api", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_are_rejected_even_on_public_routes() {
    let app = app();
    let (status, body) = app.get("/api/news/posts", Some("forged")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/news/posts")
                .header(header::AUTHORIZATION, "Token abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_users_lose_access() {
    let app = app();
    let parent = app.seed_user(app.parent_id, "parent");

    let (status, _) = app
        .patch(
            &format!("/api/accounts/users/{}", parent.id),
            Some(STAFF),
            json!({ "is_active": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/accounts/me", Some(PARENT)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User inactive or deleted.");
}

#[tokio::test]
async fn me_reports_roles_and_admin_role_grants_staff() {
    let app = app();
    app.seed_user(app.parent_id, "parent");

    let (status, body) = app.get("/api/accounts/me", Some(PARENT)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_staff"], false);
    assert_eq!(body["user"]["username"], "parent");

    let (status, _) = app.get("/api/accounts/users", Some(PARENT)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, role) = app
        .post(
            "/api/accounts/user-roles",
            Some(STAFF),
            json!({ "user": app.parent_id, "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{role}");

    let (_, body) = app.get("/api/accounts/me", Some(PARENT)).await;
    assert_eq!(body["is_staff"], true);
    assert_eq!(body["roles"], json!(["admin"]));
    let (status, users) = app.get("/api/accounts/users", Some(PARENT)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len_of(&users), 1);

    let (status, body) = app
        .post(
            "/api/accounts/user-roles",
            Some(STAFF),
            json!({ "user": app.parent_id, "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "user, role");
}

#[tokio::test]
async fn duplicate_emails_differ_only_in_case() {
    let app = app();
    let user = json!({ "email": "Office@School.test", "username": "office" });
    let (status, _) = app.post("/api/accounts/users", Some(STAFF), user).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/accounts/users",
            Some(STAFF),
            json!({ "email": "office@school.test", "username": "office2" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn deleting_a_user_cleans_up_their_rows() {
    let app = app();
    let parent = app.seed_user(app.parent_id, "parent");

    let (_, post) = app
        .post(
            "/api/news/posts",
            Some(PARENT),
            json!({ "title": "Parent Notes", "content": "Hello", "status": "published" }),
        )
        .await;
    let post_id = id_of(&post);
    app.post("/api/news/likes", Some(PARENT), json!({ "post": post_id }))
        .await;
    app.post("/api/news/likes", Some(NEIGHBOUR), json!({ "post": post_id }))
        .await;

    let (status, _) = app
        .delete(&format!("/api/accounts/users/{}", parent.id), Some(STAFF))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, stored) = app.get(&format!("/api/news/posts/{post_id}"), None).await;
    assert!(stored["author"].is_null());
    assert_eq!(stored["likes_count"], 1);
}

#[tokio::test]
async fn page_sections_are_unique_per_page() {
    let app = app();
    let section = json!({
        "page_name": "about",
        "section_name": "history",
        "content": "Founded in 1976",
    });
    let (status, _) = app.post("/api/content/page-content", None, section.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post("/api/content/page-content", None, section).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "page_name, section_name");

    let (status, body) = app
        .post(
            "/api/content/page-content",
            None,
            json!({
                "page_name": "home",
                "section_name": "stats",
                "content_type": "json",
                "content": "{not json",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "content");

    let (_, about) = app.get("/api/content/page-content?page_name=about", None).await;
    assert_eq!(len_of(&about), 1);
    let (_, home) = app.get("/api/content/page-content?page_name=home", None).await;
    assert_eq!(len_of(&home), 0);
}

#[tokio::test]
async fn contact_submissions_are_write_only_for_visitors() {
    let app = app();
    let (status, _) = app
        .post(
            "/api/content/contact-submissions",
            None,
            json!({
                "name": "Visitor",
                "email": "visitor@mail.test",
                "subject": "Admissions",
                "message": "When do forms open?",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.get("/api/content/contact-submissions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, list) = app.get("/api/content/contact-submissions", Some(STAFF)).await;
    assert_eq!(len_of(&list), 1);
}

#[tokio::test]
async fn testimonial_rating_is_bounded_and_put_replaces() {
    let app = app();
    let (status, body) = app
        .post(
            "/api/content/testimonials",
            None,
            json!({ "name": "Alumni", "content": "Great school", "rating": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "rating");

    let (_, created) = app
        .post(
            "/api/content/testimonials",
            None,
            json!({ "name": "Alumni", "designation": "Class of 2010", "content": "Great school" }),
        )
        .await;
    assert_eq!(created["rating"], 5);
    let id = id_of(&created);

    let (status, replaced) = app
        .put(
            &format!("/api/content/testimonials/{id}"),
            None,
            json!({ "name": "Alumna", "content": "Wonderful", "rating": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "Alumna");
    assert!(replaced["designation"].is_null());
    assert_eq!(replaced["created_at"], created["created_at"]);

    let (status, body) = app
        .send(Method::PATCH, &format!("/api/content/testimonials/{id}"), None, Some(json!([1])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}
