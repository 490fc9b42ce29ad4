//! HTTP-level integration tests for the `/students` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, delete_auth, delete_json_auth, get, post_json,
    put_json_auth, valid_registration,
};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// A valid registration returns 201 with the created row and a generated
/// student ID.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_201_with_generated_id(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, "/api/v1/students", valid_registration()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Student registered successfully");

    let data = &json["data"];
    assert_eq!(data["email"], "ada@example.com");
    assert_eq!(data["status"], "Active");
    let student_id = data["student_id"].as_str().unwrap();
    assert!(
        student_id.starts_with("STU") && student_id.len() == 11,
        "unexpected student id {student_id}"
    );
    // Age is computed per response, never stored.
    assert!(data["age"].is_number());
}

/// A client-supplied well-formed student ID is kept as-is.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_accepts_supplied_student_id(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = valid_registration();
    body["student_id"] = "STU20261234".into();
    let response = post_json(app, "/api/v1/students", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["student_id"], "STU20261234");
}

/// A payload with several invalid fields reports every failure at once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_collects_all_field_errors(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = valid_registration();
    body["email"] = "not-an-email".into();
    body["phone"] = "237-690-000-000".into();
    body["first_name"] = "A".into();
    let response = post_json(app, "/api/v1/students", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"phone"));
    assert!(fields.contains(&"first_name"));
}

/// An email that only matches the shape regex because of embedded markup
/// is rejected; validation runs on the scrubbed value that would be stored.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_email_that_scrubs_invalid(pool: PgPool) {
    let app = build_test_app(pool);

    let mut body = valid_registration();
    body["email"] = "foo<bar@x.com>baz".into();
    let response = post_json(app, "/api/v1/students", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "email");
}

/// An empty payload reports every required field.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_reports_missing_required_fields(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(app, "/api/v1/students", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"].as_array().unwrap().len(), 8);
}

/// Registering the same email twice returns 409 with the duplicate message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_email_returns_409(pool: PgPool) {
    let app = build_test_app(pool);

    let first = post_json(app.clone(), "/api/v1/students", valid_registration()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app, "/api/v1/students", valid_registration()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["error"], "Email already registered");
    assert_eq!(json["code"], "CONFLICT");
}

/// Registering a taken student ID returns 409 with the duplicate message.
#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_student_id_returns_409(pool: PgPool) {
    let app = build_test_app(pool);

    let mut first = valid_registration();
    first["student_id"] = "STU20260001".into();
    let response = post_json(app.clone(), "/api/v1/students", first).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut second = valid_registration();
    second["student_id"] = "STU20260001".into();
    second["email"] = "other@example.com".into();
    let response = post_json(app, "/api/v1/students", second).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Student ID already exists");
}

// ---------------------------------------------------------------------------
// Fetch and list
// ---------------------------------------------------------------------------

/// GET by id returns the row; an unknown id returns 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn get_student_by_id(pool: PgPool) {
    let app = build_test_app(pool);

    let created = post_json(app.clone(), "/api/v1/students", valid_registration()).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = get(app.clone(), &format!("/api/v1/students/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);

    let response = get(app, "/api/v1/students/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Listing returns the envelope with students and pagination metadata.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_pagination_meta(pool: PgPool) {
    let app = build_test_app(pool);

    for i in 0..3 {
        let mut body = valid_registration();
        body["email"] = format!("student{i}@example.com").into();
        let response = post_json(app.clone(), "/api/v1/students", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app, "/api/v1/students?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let data = &json["data"];
    assert_eq!(data["students"].as_array().unwrap().len(), 2);
    assert_eq!(data["pagination"]["total_records"], 3);
    assert_eq!(data["pagination"]["total_pages"], 2);
    assert_eq!(data["pagination"]["has_next"], true);
    assert_eq!(data["pagination"]["has_prev"], false);
}

/// Filters narrow the listing; search is case-insensitive.
#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_search(pool: PgPool) {
    let app = build_test_app(pool);

    let mut physics = valid_registration();
    physics["email"] = "grace@example.com".into();
    physics["first_name"] = "Grace".into();
    physics["course"] = "Physics".into();
    post_json(app.clone(), "/api/v1/students", physics).await;

    post_json(app.clone(), "/api/v1/students", valid_registration()).await;

    let response = get(app.clone(), "/api/v1/students?course=Physics").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["students"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["students"][0]["course"], "Physics");

    let response = get(app, "/api/v1/students?search=gRaCe").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["students"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["students"][0]["first_name"], "Grace");
}

/// `?stats=1` switches to the aggregate report.
#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_flag_returns_aggregates(pool: PgPool) {
    let app = build_test_app(pool);

    post_json(app.clone(), "/api/v1/students", valid_registration()).await;

    let response = get(app, "/api/v1/students?stats=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_students"], 1);
    assert_eq!(json["data"]["total_courses"], 1);
    assert_eq!(json["data"]["by_course"][0]["label"], "Mathematics");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// A partial update changes only the supplied fields and requires auth.
#[sqlx::test(migrations = "../../db/migrations")]
async fn update_requires_auth_and_is_partial(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "updater").await;
    let token = common::access_token_for(&admin);
    let app = build_test_app(pool);

    let created = post_json(app.clone(), "/api/v1/students", valid_registration()).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    // Unauthenticated update is rejected.
    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(axum::http::Method::PUT)
                .uri(format!("/api/v1/students/{id}"))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::json!({"course": "Physics"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json_auth(
        app,
        &format!("/api/v1/students/{id}"),
        serde_json::json!({"course": "Physics"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["course"], "Physics");
    // Untouched fields keep their values.
    assert_eq!(json["data"]["first_name"], "Ada");
}

/// An invalid supplied field on update is a 400 with field details.
#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_invalid_fields(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "updater2").await;
    let token = common::access_token_for(&admin);
    let app = build_test_app(pool);

    let created = post_json(app.clone(), "/api/v1/students", valid_registration()).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/v1/students/{id}"),
        serde_json::json!({"email": "broken"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "email");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Soft delete hides the row; a second delete returns 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_soft_and_not_repeatable(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "deleter").await;
    let token = common::access_token_for(&admin);
    let app = build_test_app(pool);

    let created = post_json(app.clone(), "/api/v1/students", valid_registration()).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/students/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Hidden from reads.
    let response = get(app.clone(), &format!("/api/v1/students/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Second delete reports 404.
    let response = delete_auth(app.clone(), &format!("/api/v1/students/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The email is released for re-registration.
    let response = post_json(app, "/api/v1/students", valid_registration()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Bulk delete requires the `bulk=1` flag and reports the affected count,
/// skipping rows that were already deleted.
#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_delete_counts_only_live_rows(pool: PgPool) {
    let (admin, _) = create_admin(&pool, "bulk").await;
    let token = common::access_token_for(&admin);
    let app = build_test_app(pool);

    let mut ids = Vec::new();
    for i in 0..2 {
        let mut body = valid_registration();
        body["email"] = format!("bulk{i}@example.com").into();
        let created = post_json(app.clone(), "/api/v1/students", body).await;
        ids.push(body_json(created).await["data"]["id"].as_i64().unwrap());
    }

    // Delete one up front so it does not count again.
    delete_auth(app.clone(), &format!("/api/v1/students/{}", ids[0]), &token).await;

    // Missing bulk flag: rejected.
    let response = delete_json_auth(
        app.clone(),
        "/api/v1/students",
        serde_json::json!({"ids": ids}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_json_auth(
        app,
        "/api/v1/students?bulk=1",
        serde_json::json!({"ids": ids}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["deleted"], 1);
}
