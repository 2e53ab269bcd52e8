// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::billing::UsageKind;
use crate::services::{ai_client::AiError, export::ExportError, stripe::StripeError};

// Nosso tipo de erro central. Cada variante sabe qual status HTTP representa.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("User with this email already exists")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // 404 também para documentos de outro usuário (não revelamos que existem)
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Limite de uso atingido para {0:?}")]
    UsageLimitReached(UsageKind),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid format")]
    InvalidExportFormat,

    #[error("Geração falhou: {0}")]
    GenerationFailed(String),

    #[error("Erro do provedor de IA: {0}")]
    Ai(#[from] AiError),

    #[error("Erro de exportação: {0}")]
    Export(#[from] ExportError),

    #[error("Erro do webhook do Stripe: {0}")]
    Stripe(#[from] StripeError),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Erro 500 já "mascarado" pelo handler: só a mensagem pública vai para o cliente.
    #[error("{public}: {source}")]
    Masked {
        public: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::MissingCredentials
            | AppError::EmailAlreadyExists
            | AppError::UnknownField(_)
            | AppError::InvalidExportFormat => StatusCode::BAD_REQUEST,
            AppError::Stripe(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UsageLimitReached(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Troca a mensagem de erros 5xx por uma mensagem genérica da rota.
    /// Erros 4xx passam intactos.
    pub fn masked(self, public: &'static str) -> AppError {
        if self.status().is_server_error() {
            AppError::Masked {
                public,
                source: Box::new(self),
            }
        } else {
            self
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::BadRequest(message) => message,
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::InvalidToken => "Unauthorized".to_string(),
            AppError::UserNotFound => "User not found".to_string(),
            AppError::UsageLimitReached(kind) => format!(
                "Usage limit reached. Please upgrade your plan to generate more {}.",
                kind.display_plural()
            ),
            AppError::Stripe(ref e) if status == StatusCode::BAD_REQUEST => e.to_string(),
            ref e if !status.is_server_error() => e.to_string(),

            // Os detalhes ficam só no log.
            AppError::Masked { public, source } => {
                tracing::error!("🔥 {}: {}", public, source);
                public.to_string()
            }
            ref e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
