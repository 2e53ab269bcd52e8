// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{config::AppState, services::health::HealthReport};

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Todos os componentes saudáveis", body = HealthReport),
        (status = 503, description = "Algum componente degradado ou fora do ar", body = HealthReport)
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let report = app_state.health_service.run().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
