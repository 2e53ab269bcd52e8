// src/handlers/fields.rs

use axum::{extract::Path, Json};

use crate::{
    common::error::AppError,
    services::fields::{all_fields, get_field_configuration, FieldConfiguration},
};

// GET /api/fields
#[utoipa::path(
    get,
    path = "/api/fields",
    tag = "Fields",
    responses(
        (status = 200, description = "Áreas de atuação disponíveis", body = [FieldConfiguration])
    )
)]
pub async fn list_fields() -> Json<&'static [FieldConfiguration]> {
    Json(all_fields())
}

// GET /api/fields/{id}
#[utoipa::path(
    get,
    path = "/api/fields/{id}",
    tag = "Fields",
    params(
        ("id" = String, Path, description = "ID da área (ex: technology)")
    ),
    responses(
        (status = 200, description = "Configuração da área", body = FieldConfiguration),
        (status = 404, description = "Área não encontrada")
    )
)]
pub async fn get_field(Path(id): Path<String>) -> Result<Json<&'static FieldConfiguration>, AppError> {
    get_field_configuration(&id)
        .map(Json)
        .ok_or(AppError::NotFound("Field not found"))
}
