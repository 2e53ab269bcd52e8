// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::document::{Document, DocumentKind, DocumentSummary},
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDocumentsQuery {
    /// `proposal` ou `pitch-deck`
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<DocumentKind>,
    pub limit: Option<i64>,
}

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    params(ListDocumentsQuery),
    responses(
        (status = 200, description = "Documentos do usuário, mais recentes primeiro", body = [DocumentSummary]),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<DocumentSummary>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let documents = app_state
        .documents
        .list_for_user(user.id, query.kind, limit)
        .await
        .map_err(|e| e.masked("Failed to fetch documents"))?;

    Ok(Json(documents))
}

// GET /api/documents/{id}
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(
        ("id" = String, Path, description = "ID do documento (prop_... ou deck_...)")
    ),
    responses(
        (status = 200, description = "Documento completo", body = Document),
        (status = 401, description = "Não autorizado"),
        (status = 404, description = "Documento não encontrado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let document = app_state
        .documents
        .find_for_user(&id, user.id, None)
        .await
        .map_err(|e| e.masked("Failed to fetch document"))?
        .ok_or(AppError::NotFound("Document not found"))?;

    Ok(Json(document))
}
