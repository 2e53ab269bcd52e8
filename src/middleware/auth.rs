// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use chrono::{DateTime, Utc};

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Usuário dono do token, inserido nos extensions pelo `auth_guard`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Expiração da sessão atual (o `exp` do JWT).
#[derive(Debug, Clone, Copy)]
pub struct SessionExpiry(pub DateTime<Utc>);

// Exige `Authorization: Bearer <jwt>` válido; qualquer falha vira 401
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(AppError::InvalidToken);
    };

    let (user, expires) = app_state
        .auth_service
        .validate_token(bearer.token())
        .await
        .map_err(|e| match e {
            // Token válido de usuário removido também é 401
            AppError::UserNotFound => AppError::InvalidToken,
            other => other,
        })?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    request.extensions_mut().insert(SessionExpiry(expires));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

impl<S> FromRequestParts<S> for SessionExpiry
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionExpiry>()
            .copied()
            .ok_or(AppError::InvalidToken)
    }
}
