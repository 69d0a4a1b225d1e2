//! HTTP-level integration tests for registration, login, and profiles.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, get, get_auth, post_json, put_json_auth, seed_user, token_for,
    TEST_PASSWORD,
};
use serde_json::json;
use sponnect_core::roles::Role;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_influencer_and_login(pool: PgPool) {
    let body = json!({
        "username": "ivy",
        "email": "Ivy@Example.com",
        "password": "long-enough-password",
        "role": "influencer",
        "influencer_name": "Ivy Reviews",
        "niche": "tech",
        "reach": 5000,
        "company_name": "ignored for influencers",
    });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "influencer");
    assert_eq!(json["data"]["email"], "ivy@example.com");
    assert_eq!(json["data"]["reach"], 5000);
    assert!(json["data"].get("company_name").is_none());
    assert!(json["data"].get("password_hash").is_none());

    // Login works with username or email.
    for login in ["ivy", "ivy@example.com"] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/auth/login",
            json!({ "username": login, "password": "long-enough-password" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user_role"], "influencer");
        assert_eq!(json["expires_in"], 3600);
        assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_admin_and_short_password(pool: PgPool) {
    let admin = json!({
        "username": "mallory",
        "email": "mallory@example.com",
        "password": "long-enough-password",
        "role": "admin",
    });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/register", admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let short = json!({
        "username": "shorty",
        "email": "shorty@example.com",
        "password": "abc",
    });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/register", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let bad_email = json!({
        "username": "bademail",
        "email": "not-an-email",
        "password": "long-enough-password",
    });
    let response = post_json(build_test_app(pool), "/api/v1/auth/register", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_conflicts(pool: PgPool) {
    seed_user(&pool, "taken", Role::Influencer).await;

    let body = json!({
        "username": "taken",
        "email": "fresh@example.com",
        "password": "long-enough-password",
    });
    let response = post_json(build_test_app(pool), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Username already exists");
}

// ---------------------------------------------------------------------------
// Login gates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_sponsor_cannot_login_until_approved(pool: PgPool) {
    let body = json!({
        "username": "acme",
        "email": "acme@example.com",
        "password": "long-enough-password",
        "role": "sponsor",
        "company_name": "Acme",
    });
    let response = post_json(build_test_app(pool.clone()), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["sponsor_approved"], false);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        json!({ "username": "acme", "password": "long-enough-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_password_is_unauthorized(pool: PgPool) {
    seed_user(&pool, "ivy", Role::Influencer).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/login",
        json!({ "username": "ivy", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        json!({ "username": "nobody", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/profile").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool), "/api/v1/profile", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_update_keeps_role_fields(pool: PgPool) {
    let sponsor = seed_user(&pool, "acme", Role::Sponsor).await;
    let token = token_for(&sponsor);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/profile",
        &token,
        json!({ "industry": "Retail", "niche": "not for sponsors" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["industry"], "Retail");
    assert!(json["data"].get("niche").is_none());

    let response = get_auth(build_test_app(pool), "/api/v1/profile", &token).await;
    assert_eq!(body_json(response).await["data"]["company_name"], "acme Inc");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_influencer_profile(pool: PgPool) {
    let sponsor = seed_user(&pool, "acme", Role::Sponsor).await;
    let influencer = seed_user(&pool, "ivy", Role::Influencer).await;
    let token = token_for(&sponsor);

    let uri = format!("/api/v1/influencers/{}/profile", influencer.id);
    let response = get_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["influencer_name"], "ivy Media");
    assert!(json["data"].get("email").is_none());

    // A sponsor id is not an influencer profile.
    let uri = format!("/api/v1/influencers/{}/profile", sponsor.id);
    let response = get_auth(build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
