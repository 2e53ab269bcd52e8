// src/handlers/generate.rs

use axum::{body::Bytes, extract::State, Json};
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use crate::{
    common::{error::AppError, ids::document_id},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::User,
        billing::UsageKind,
        document::{Document, DocumentKind, NewDocument},
        generation::{
            GenerationMetadata, GenerationOutcome, GenerationResponse, PitchDeckPayload, ProposalPayload,
        },
    },
};

// O corpo só é lido depois do bloqueio de uso, por isso chega como bytes
fn parse_body<T: DeserializeOwned + Validate>(body: &Bytes) -> Result<T, AppError> {
    let payload: T = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
    payload.validate()?;
    Ok(payload)
}

async fn ensure_quota(app_state: &AppState, user: &User, kind: UsageKind) -> Result<(), AppError> {
    if !app_state.subscription_service.can_user_generate(user.id, kind).await? {
        tracing::info!(user_id = %user.id, ?kind, "Limite de uso atingido");
        return Err(AppError::UsageLimitReached(kind));
    }
    Ok(())
}

fn successful(outcome: GenerationOutcome) -> Result<GenerationOutcome, AppError> {
    if outcome.success {
        Ok(outcome)
    } else {
        Err(AppError::GenerationFailed(outcome.error.unwrap_or_default()))
    }
}

/// Salva o documento e só então consome a cota. Cota recusada (corrida perdida)
/// ou erro no contador desfaz a inserção; inserção com erro não consome nada.
async fn store_and_consume(
    app_state: &AppState,
    user: &User,
    kind: UsageKind,
    document: NewDocument,
) -> Result<Document, AppError> {
    let document = app_state.documents.insert(document).await?;

    if let Err(e) = app_state.subscription_service.consume_generation(user.id, kind).await {
        if let Err(cleanup) = app_state.documents.delete_for_user(&document.id, user.id).await {
            tracing::error!(document_id = %document.id, "🔥 Falha ao remover documento sem cota: {}", cleanup);
        }
        return Err(e);
    }

    Ok(document)
}

fn response(id: String, message: &str, field: String, outcome: &GenerationOutcome) -> GenerationResponse {
    GenerationResponse {
        id,
        message: message.to_string(),
        metadata: GenerationMetadata {
            field,
            model: outcome.model.clone(),
            tokens_used: outcome.tokens_used,
            generation_time: outcome.generation_time,
        },
    }
}

// POST /api/generate/proposal
#[utoipa::path(
    post,
    path = "/api/generate/proposal",
    tag = "Generate",
    request_body = ProposalPayload,
    responses(
        (status = 200, description = "Proposta gerada e salva", body = GenerationResponse),
        (status = 400, description = "Corpo inválido ou área desconhecida"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Limite do plano atingido"),
        (status = 500, description = "Falha na geração")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn generate_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Bytes,
) -> Result<Json<GenerationResponse>, AppError> {
    proposal_flow(&app_state, &user, &body)
        .await
        .map(Json)
        .map_err(|e| e.masked("Failed to generate proposal"))
}

async fn proposal_flow(app_state: &AppState, user: &User, body: &Bytes) -> Result<GenerationResponse, AppError> {
    let kind = UsageKind::Proposals;
    ensure_quota(app_state, user, kind).await?;

    let payload: ProposalPayload = parse_body(body)?;
    let request = payload.into_request();

    let outcome = app_state
        .generation_service
        .generate_proposal(&request)
        .await
        .and_then(successful)?;

    let metadata = json!({
        "field": request.field,
        "model": outcome.model,
        "tokensUsed": outcome.tokens_used,
        "generationTime": outcome.generation_time,
        "fieldSpecificData": request.field_specific_data,
    });

    // Corrida perdida = 403 e nada fica salvo
    let document = store_and_consume(
        app_state,
        user,
        kind,
        NewDocument {
            id: document_id(DocumentKind::Proposal.id_prefix()),
            user_id: user.id,
            kind: DocumentKind::Proposal,
            client_name: request.client_name.clone(),
            client_company: request.client_company.clone(),
            project_title: request.project_title.clone(),
            content: outcome.content.clone(),
            metadata,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, document_id = %document.id, model = %outcome.model, "✅ Proposta gerada");

    Ok(response(document.id, "Proposal generated successfully", request.field, &outcome))
}

// POST /api/generate/pitch-deck
#[utoipa::path(
    post,
    path = "/api/generate/pitch-deck",
    tag = "Generate",
    request_body = PitchDeckPayload,
    responses(
        (status = 200, description = "Pitch deck gerado e salvo", body = GenerationResponse),
        (status = 400, description = "Corpo inválido ou área desconhecida"),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Limite do plano atingido"),
        (status = 500, description = "Falha na geração")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn generate_pitch_deck(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Bytes,
) -> Result<Json<GenerationResponse>, AppError> {
    pitch_deck_flow(&app_state, &user, &body)
        .await
        .map(Json)
        .map_err(|e| e.masked("Failed to generate pitch deck"))
}

async fn pitch_deck_flow(app_state: &AppState, user: &User, body: &Bytes) -> Result<GenerationResponse, AppError> {
    let kind = UsageKind::PitchDecks;
    ensure_quota(app_state, user, kind).await?;

    let payload: PitchDeckPayload = parse_body(body)?;
    let request = payload.into_request();

    let outcome = app_state
        .generation_service
        .generate_pitch_deck(&request)
        .await
        .and_then(successful)?;

    let metadata = json!({
        "field": request.field,
        "model": outcome.model,
        "tokensUsed": outcome.tokens_used,
        "generationTime": outcome.generation_time,
        "visualMode": request.visual_mode,
        "fieldSpecificData": request.field_specific_data,
    });

    // No deck: client_name = startup, project_title = tagline (ou o próprio nome)
    let document = store_and_consume(
        app_state,
        user,
        kind,
        NewDocument {
            id: document_id(DocumentKind::PitchDeck.id_prefix()),
            user_id: user.id,
            kind: DocumentKind::PitchDeck,
            client_name: request.startup_name.clone(),
            client_company: None,
            project_title: request.tagline.clone().unwrap_or_else(|| request.startup_name.clone()),
            content: outcome.content.clone(),
            metadata,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, document_id = %document.id, model = %outcome.model, "✅ Pitch deck gerado");

    Ok(response(document.id, "Pitch deck generated successfully", request.field, &outcome))
}
