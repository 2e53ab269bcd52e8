// src/handlers/dashboard.rs

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::document::DashboardSummary,
    services::subscription::month_start,
};

const RECENT_DOCUMENTS: i64 = 3;

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Documentos recentes, totais, assinatura e uso", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = async {
        let recent_documents = app_state
            .documents
            .list_for_user(user.id, None, RECENT_DOCUMENTS)
            .await?;
        let stats = app_state
            .documents
            .stats_for_user(user.id, month_start(Utc::now()))
            .await?;
        let subscription = app_state.subscription_service.get_user_subscription(user.id).await?;
        let usage = app_state.subscription_service.get_user_usage(user.id).await?;

        Ok::<_, AppError>(DashboardSummary {
            recent_documents,
            stats,
            subscription,
            usage,
        })
    }
    .await
    .map_err(|e| e.masked("Failed to load dashboard"))?;

    Ok(Json(summary))
}
