#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sponnect_api::app::build_router;
use sponnect_api::auth::jwt::JwtConfig;
use sponnect_api::auth::password::hash_password;
use sponnect_api::config::{DatabaseConfig, ServerConfig};
use sponnect_api::state::AppState;
use sponnect_core::roles::Role;
use sponnect_db::models::user::{CreateUser, User};
use sponnect_db::repositories::UserRepo;

/// Password given to every seeded user.
pub const TEST_PASSWORD: &str = "test_password_123!";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        // `#[sqlx::test]` hands over its own pool; the URL is never dialled.
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The production router over a test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Run one request through a fresh clone of the router.
async fn call(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    call(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    call(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    call(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    call(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    call(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    call(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    call(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    call(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly. Sponsors are created approved.
pub async fn seed_user(pool: &PgPool, username: &str, role: Role) -> User {
    let influencer = role == Role::Influencer;
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role,
            sponsor_approved: true,
            company_name: (role == Role::Sponsor).then(|| format!("{username} Inc")),
            industry: None,
            influencer_name: influencer.then(|| format!("{username} Media")),
            category: influencer.then(|| "tech".to_string()),
            niche: influencer.then(|| "gadgets".to_string()),
            reach: influencer.then_some(10_000),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint an access token for a seeded user without going through login.
pub fn token_for(user: &User) -> String {
    let role = Role::from_str_db(&user.role).expect("seeded role is valid");
    test_config()
        .jwt
        .issue(user.id, role)
        .expect("token signing should succeed")
        .token
}

/// Create a campaign through the API and return its id.
pub async fn create_campaign(app: Router, sponsor_token: &str, visibility: &str) -> i64 {
    let body = serde_json::json!({
        "name": "Spring launch",
        "description": "New product line",
        "budget": 5000,
        "start_date": "2026-03-01T00:00:00Z",
        "end_date": "2026-06-01T00:00:00Z",
        "visibility": visibility,
    });
    let response = post_json_auth(app, "/api/v1/sponsor/campaigns", sponsor_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("campaign id")
}
