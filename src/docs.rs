// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::session,

        // --- Generate ---
        handlers::generate::generate_proposal,
        handlers::generate::generate_pitch_deck,

        // --- Export ---
        handlers::export::export_proposal,
        handlers::export::export_pitch_deck,

        // --- Documents ---
        handlers::documents::list_documents,
        handlers::documents::get_document,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Billing ---
        handlers::billing::list_plans,
        handlers::billing::get_subscription,

        // --- Fields ---
        handlers::fields::list_fields,
        handlers::fields::get_field,

        // --- Health / Stripe ---
        handlers::health::health_check,
        handlers::stripe::webhook,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::SessionUser,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RegisterResponse,
            models::auth::AuthResponse,
            models::auth::SessionResponse,

            // --- Generation ---
            models::generation::ModelPreference,
            models::generation::ExportFormat,
            models::generation::ProposalPayload,
            models::generation::PitchDeckPayload,
            models::generation::GenerationMetadata,
            models::generation::GenerationResponse,

            // --- Documents ---
            models::document::DocumentKind,
            models::document::Document,
            models::document::DocumentSummary,
            models::document::DashboardStats,
            models::document::DashboardSummary,

            // --- Billing ---
            models::billing::Plan,
            models::billing::SubscriptionStatus,
            models::billing::PlanLimits,
            models::billing::PlanDetails,
            models::billing::Subscription,
            models::billing::Usage,
            models::billing::BillingOverview,

            // --- Fields ---
            services::fields::FormFieldType,
            services::fields::FormField,
            services::fields::ProposalWorkflow,
            services::fields::PitchDeckWorkflow,
            services::fields::Workflows,
            services::fields::FieldConfiguration,

            // --- Health ---
            services::health::HealthStatus,
            services::health::CheckResult,
            services::health::HealthReport,
        )
    ),
    tags(
        (name = "Auth", description = "Registro, login e sessão"),
        (name = "Generate", description = "Geração de propostas e pitch decks por IA"),
        (name = "Export", description = "Download em PDF e DOCX"),
        (name = "Documents", description = "Documentos gerados pelo usuário"),
        (name = "Dashboard", description = "Resumo da conta"),
        (name = "Billing", description = "Planos, assinatura e uso mensal"),
        (name = "Fields", description = "Áreas de atuação e formulários"),
        (name = "Health", description = "Saúde dos componentes"),
        (name = "Stripe", description = "Webhook de assinaturas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
