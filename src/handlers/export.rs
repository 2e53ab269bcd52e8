// src/handlers/export.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::document::{Document, DocumentKind},
    services::export::{ExportedFile, ProposalFormat},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `pdf` (padrão) ou `docx`
    pub format: Option<String>,
}

fn file_response(file: ExportedFile) -> Response {
    let disposition = file.content_disposition();
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

async fn owned_document(app_state: &AppState, id: &str, user_id: uuid::Uuid, kind: DocumentKind) -> Result<Document, AppError> {
    app_state
        .documents
        .find_for_user(id, user_id, Some(kind))
        .await?
        .ok_or(AppError::NotFound(kind.not_found_message()))
}

// GET /api/export/proposal/{id}
#[utoipa::path(
    get,
    path = "/api/export/proposal/{id}",
    tag = "Export",
    params(
        ("id" = String, Path, description = "ID da proposta"),
        ExportQuery
    ),
    responses(
        (status = 200, description = "Arquivo PDF ou DOCX"),
        (status = 400, description = "Formato inválido"),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Proposta não encontrada"),
        (status = 500, description = "Falha na exportação")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn export_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let file = async {
        let document = owned_document(&app_state, &id, user.id, DocumentKind::Proposal).await?;
        let format = ProposalFormat::parse(query.format.as_deref())?;
        app_state.export_service.export_proposal(&document, format).await
    }
    .await
    .map_err(|e| e.masked("Failed to export proposal"))?;

    Ok(file_response(file))
}

// GET /api/export/pitch-deck/{id}
#[utoipa::path(
    get,
    path = "/api/export/pitch-deck/{id}",
    tag = "Export",
    params(
        ("id" = String, Path, description = "ID do pitch deck")
    ),
    responses(
        (status = 200, description = "Arquivo PDF em paisagem"),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Pitch deck não encontrado"),
        (status = 500, description = "Falha na exportação")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn export_pitch_deck(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let file = async {
        let document = owned_document(&app_state, &id, user.id, DocumentKind::PitchDeck).await?;
        app_state.export_service.export_pitch_deck(&document).await
    }
    .await
    .map_err(|e| e.masked("Failed to export pitch deck"))?;

    Ok(file_response(file))
}
