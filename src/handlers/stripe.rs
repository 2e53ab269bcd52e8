// src/handlers/stripe.rs

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{common::error::AppError, config::AppState, services::stripe::WebhookOutcome};

const SIGNATURE_HEADER: &str = "stripe-signature";

// POST /api/stripe/webhook
#[utoipa::path(
    post,
    path = "/api/stripe/webhook",
    tag = "Stripe",
    request_body(content = String, description = "Evento bruto do Stripe", content_type = "application/json"),
    params(
        ("Stripe-Signature" = String, Header, description = "t=<timestamp>,v1=<hmac-sha256>")
    ),
    responses(
        (status = 200, description = "Evento recebido"),
        (status = 204, description = "Webhook desabilitado (sem segredo configurado)"),
        (status = 400, description = "Assinatura ou payload inválido"),
        (status = 500, description = "Falha ao processar o evento")
    )
)]
pub async fn webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    let outcome = app_state
        .stripe_service
        .handle(signature, &body)
        .await
        .map_err(|e| e.masked("Webhook handler failed"))?;

    match outcome {
        WebhookOutcome::Disabled => Ok(StatusCode::NO_CONTENT.into_response()),
        WebhookOutcome::Processed(_) | WebhookOutcome::Ignored(_) => {
            Ok((StatusCode::OK, Json(json!({ "received": true }))).into_response())
        }
    }
}
