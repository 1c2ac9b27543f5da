//! Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the database cannot be queried
    pub status: String,
    pub version: String,
    /// `ok` or `unavailable`
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_rentals: Option<i64>,
}

/// Report service and database status
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthResponse),
        (status = 503, description = "Database cannot be queried", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION").to_string();

    match state.services.reports.circulation_counts().await {
        Ok((books, open_rentals)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                version,
                database: "ok".to_string(),
                books: Some(books),
                open_rentals: Some(open_rentals),
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    version,
                    database: "unavailable".to_string(),
                    books: None,
                    open_rentals: None,
                }),
            )
        }
    }
}
