//! HTTP-level integration tests for the `/auth` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    access_token_for, body_json, build_test_app, create_admin, get_auth, post_json,
    post_json_auth,
};
use chrono::{Duration, Utc};
use registry_db::repositories::SessionRepo;
use sqlx::PgPool;

/// Log in via the API and return the parsed JSON response.
async fn login(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Successful login returns tokens and public user info.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success(pool: PgPool) {
    let (user, password) = create_admin(&pool, "loginuser").await;
    let app = build_test_app(pool);

    let json = login(app, "loginuser", &password).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["role"], "admin");
    // The password hash must never appear in responses.
    assert!(json["user"].get("password_hash").is_none());
}

/// Wrong password and unknown username both return the same 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) {
    create_admin(&pool, "real-user").await;
    let app = build_test_app(pool);

    let wrong_pw = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({"username": "real-user", "password": "nope"}),
    )
    .await;
    let no_user = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"username": "ghost", "password": "nope"}),
    )
    .await;

    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(no_user.status(), StatusCode::UNAUTHORIZED);
    let a = body_json(wrong_pw).await;
    let b = body_json(no_user).await;
    assert_eq!(a["error"], b["error"]);
}

/// Logging in sweeps sessions that are past their expiry.
#[sqlx::test(migrations = "../../db/migrations")]
async fn login_purges_expired_sessions(pool: PgPool) {
    let (user, password) = create_admin(&pool, "sweeper").await;
    SessionRepo::create(&pool, user.id, "stale-hash", Utc::now() - Duration::days(1))
        .await
        .unwrap();
    let app = build_test_app(pool.clone());

    login(app, "sweeper", &password).await;

    let stale: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE token_hash = 'stale-hash'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stale, 0, "expired session should have been purged");
}

/// Refresh rotates the session: the new token works, the old one does not.
#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_tokens(pool: PgPool) {
    let (_, password) = create_admin(&pool, "refresher").await;
    let app = build_test_app(pool);

    let json = login(app.clone(), "refresher", &password).await;
    let old_refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": old_refresh}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_ne!(json["refresh_token"], old_refresh);

    // The rotated-out token is no longer accepted.
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": old_refresh}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes the presented refresh token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_session(pool: PgPool) {
    let (_, password) = create_admin(&pool, "leaver").await;
    let app = build_test_app(pool);

    let json = login(app.clone(), "leaver", &password).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({"refresh_token": refresh}),
        &access,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({"refresh_token": refresh}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// `/auth/me` returns the current user and requires a valid token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn me_returns_current_user(pool: PgPool) {
    let (user, _) = create_admin(&pool, "whoami").await;
    let token = access_token_for(&user);
    let app = build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "whoami");

    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
