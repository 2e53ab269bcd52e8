// src/handlers/billing.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::billing::{BillingOverview, Plan, PlanDetails},
};

// GET /api/billing/plans
#[utoipa::path(
    get,
    path = "/api/billing/plans",
    tag = "Billing",
    responses(
        (status = 200, description = "Tabela de planos", body = [PlanDetails])
    )
)]
pub async fn list_plans() -> Json<Vec<PlanDetails>> {
    Json(Plan::ALL.iter().map(|plan| plan.details()).collect())
}

// GET /api/billing/subscription
#[utoipa::path(
    get,
    path = "/api/billing/subscription",
    tag = "Billing",
    responses(
        (status = 200, description = "Assinatura, uso do mês e limites", body = BillingOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_subscription(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<BillingOverview>, AppError> {
    let overview = app_state
        .subscription_service
        .overview(user.id)
        .await
        .map_err(|e| e.masked("Failed to fetch subscription"))?;

    Ok(Json(overview))
}
