// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, SessionExpiry},
    models::auth::{
        AuthResponse, LoginUserPayload, RegisterResponse, RegisterUserPayload, SessionResponse,
        SessionUser,
    },
};

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = RegisterResponse),
        (status = 400, description = "Credenciais ausentes, inválidas ou e-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Ausência de credenciais tem mensagem própria, tratada no serviço
    if filled(&payload.email) && filled(&payload.password) {
        payload.validate()?;
    }

    let user = app_state
        .auth_service
        .register(payload.email.as_deref(), payload.password.as_deref(), payload.name)
        .await
        .map_err(|e| e.masked("Internal server error"))?;

    let body = RegisterResponse {
        message: "User created successfully".to_string(),
        user,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 400, description = "Credenciais ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let (issued, user) = app_state
        .auth_service
        .login(payload.email.as_deref(), payload.password.as_deref())
        .await?;

    tracing::info!(user_id = %user.id, "🔑 Login realizado");

    Ok(Json(AuthResponse {
        token: issued.token,
        expires: issued.expires,
        user,
    }))
}

// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessão atual", body = SessionResponse),
        (status = 401, description = "Sem sessão")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn session(
    AuthenticatedUser(user): AuthenticatedUser,
    SessionExpiry(expires): SessionExpiry,
) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: SessionUser::from(&user),
        expires,
    })
}
