use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Open connections, idle or in use.
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// GET /health
///
/// 200 while the database answers, 503 otherwise. Mounted at the root, not
/// under `/api/v1`.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = match sponnect_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };

    let (status_code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            reachable,
            pool_size: state.pool.size(),
            idle_connections: state.pool.num_idle(),
        },
    };
    (status_code, Json(body))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
