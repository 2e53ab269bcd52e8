// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Tudo daqui para baixo exige o Bearer token
    let session_routes = Router::new()
        .route("/session", get(handlers::auth::session))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let generate_routes = Router::new()
        .route("/proposal", post(handlers::generate::generate_proposal))
        .route("/pitch-deck", post(handlers::generate::generate_pitch_deck))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let export_routes = Router::new()
        .route("/proposal/{id}", get(handlers::export::export_proposal))
        .route("/pitch-deck/{id}", get(handlers::export::export_pitch_deck))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let document_routes = Router::new()
        .route("/", get(handlers::documents::list_documents))
        .route("/{id}", get(handlers::documents::get_document))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let account_routes = Router::new()
        .route("/api/dashboard", get(handlers::dashboard::get_summary))
        .route("/api/billing/subscription", get(handlers::billing::get_subscription))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/fields", get(handlers::fields::list_fields))
        .route("/api/fields/{id}", get(handlers::fields::get_field))
        .route("/api/billing/plans", get(handlers::billing::list_plans))
        .route("/api/stripe/webhook", post(handlers::stripe::webhook))
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api/generate", generate_routes)
        .nest("/api/export", export_routes)
        .nest("/api/documents", document_routes)
        .merge(account_routes)
        .with_state(app_state)
}
