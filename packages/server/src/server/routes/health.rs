use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::time::Duration;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: DatabaseHealth,
    pool: PoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct PoolHealth {
    size: u32,
    idle: usize,
}

/// Health check endpoint.
///
/// Probes database connectivity with a bounded round-trip and reports
/// connection pool utilization. 200 when healthy, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let probe = tokio::time::timeout(
        Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.db_pool),
    )
    .await;

    let database = match probe {
        Ok(Ok(_)) => DatabaseHealth {
            ok: true,
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            ok: false,
            error: Some(e.to_string()),
        },
        Err(_) => DatabaseHealth {
            ok: false,
            error: Some("probe timed out (>5s)".to_string()),
        },
    };

    let pool = PoolHealth {
        size: state.db_pool.size(),
        idle: state.db_pool.num_idle(),
    };

    let (status_code, status) = if database.ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            database,
            pool,
        }),
    )
}
