// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{BillingRepository, BillingStore, DocumentRepository, DocumentStore, UserRepository, UserStore},
    services::{
        ai_client::{OpenRouterClient, TextGenerator, DEFAULT_BASE_URL},
        export::pdf::{ChromiumPdf, NativePdf, PdfRenderer},
        health::{AiServiceCheck, DatabaseCheck, HealthCheck, StorageCheck, StripeCheck},
        stripe::PriceTable,
        AuthService, ExportService, GenerationService, HealthService, StripeWebhookService,
        SubscriptionService,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} deve ser definida")]
    Missing(&'static str),

    #[error("Valor inválido para {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfEngine {
    Native,
    Chromium,
}

impl FromStr for PdfEngine {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(PdfEngine::Native),
            "chromium" => Ok(PdfEngine::Chromium),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub session_max_age_days: i64,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub ai_request_timeout: Duration,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_prices: PriceTable,
    pub pdf_engine: PdfEngine,
    pub chrome_bin: String,
    pub fonts_dir: PathBuf,
    pub font_family: String,
}

// Não vaza segredos nos logs
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_max_connections", &self.db_max_connections)
            .field("session_max_age_days", &self.session_max_age_days)
            .field("openrouter_configured", &self.openrouter_api_key.is_some())
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("ai_request_timeout", &self.ai_request_timeout)
            .field("stripe_webhook_enabled", &self.stripe_webhook_secret.is_some())
            .field("pdf_engine", &self.pdf_engine)
            .field("fonts_dir", &self.fonts_dir)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte chave → valor.
    /// Valores vazios contam como ausentes.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        fn parsed<T: FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
            match raw {
                Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
                None => Ok(default),
            }
        }

        let bind_addr = parsed("BIND_ADDR", get("BIND_ADDR"), SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let db_max_connections = parsed("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5u32)?;
        let session_max_age_days = parsed("SESSION_MAX_AGE_DAYS", get("SESSION_MAX_AGE_DAYS"), 30i64)?;
        let timeout_secs = parsed("AI_REQUEST_TIMEOUT_SECS", get("AI_REQUEST_TIMEOUT_SECS"), 120u64)?;
        let pdf_engine = parsed("PDF_ENGINE", get("PDF_ENGINE"), PdfEngine::Native)?;

        if db_max_connections == 0 {
            return Err(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", value: "0".into() });
        }
        if session_max_age_days <= 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_MAX_AGE_DAYS",
                value: session_max_age_days.to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr,
            db_max_connections,
            session_max_age_days,
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            openrouter_base_url: get("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ai_request_timeout: Duration::from_secs(timeout_secs),
            stripe_webhook_secret: get("STRIPE_WEBHOOK_SECRET"),
            stripe_prices: PriceTable {
                pro: get("STRIPE_PRO_PRICE_ID"),
                enterprise: get("STRIPE_ENTERPRISE_PRICE_ID"),
            },
            pdf_engine,
            chrome_bin: get("CHROME_BIN").unwrap_or_else(|| "chromium".to_string()),
            fonts_dir: get("FONTS_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./fonts")),
            font_family: get("FONT_FAMILY").unwrap_or_else(|| "Roboto".to_string()),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub auth_service: AuthService,
    pub subscription_service: SubscriptionService,
    pub generation_service: GenerationService,
    pub export_service: ExportService,
    pub stripe_service: StripeWebhookService,
    pub health_service: HealthService,
}

/// Dependências externas já construídas; o resto do grafo sai daqui.
pub struct StateParts {
    pub users: Arc<dyn UserStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub billing: Arc<dyn BillingStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub pdf: Arc<dyn PdfRenderer>,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    pub jwt_secret: String,
    pub session_max_age_days: i64,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_prices: PriceTable,
}

impl AppState {
    pub fn from_parts(parts: StateParts) -> Self {
        let subscription_service = SubscriptionService::new(parts.billing);

        Self {
            auth_service: AuthService::new(parts.users, parts.jwt_secret, parts.session_max_age_days),
            stripe_service: StripeWebhookService::new(
                parts.stripe_webhook_secret,
                parts.stripe_prices,
                subscription_service.clone(),
            ),
            subscription_service,
            generation_service: GenerationService::new(parts.generator),
            export_service: ExportService::new(parts.pdf),
            health_service: HealthService::new(parts.health_checks),
            documents: parts.documents,
        }
    }

    /// Conecta ao banco e monta o grafo de dependências de produção.
    /// Devolve também o pool para as migrações.
    pub async fn new(config: &AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let generator = OpenRouterClient::new(
            config.openrouter_api_key.clone(),
            config.openrouter_base_url.clone(),
            config.ai_request_timeout,
        )?;
        if !generator.is_configured() {
            tracing::warn!("OPENROUTER_API_KEY não definida: gerações vão falhar");
        }

        let (pdf, fonts_dir): (Arc<dyn PdfRenderer>, Option<PathBuf>) = match config.pdf_engine {
            PdfEngine::Native => (
                Arc::new(NativePdf::new(config.fonts_dir.clone(), config.font_family.clone())) as Arc<dyn PdfRenderer>,
                Some(config.fonts_dir.clone()),
            ),
            PdfEngine::Chromium => (Arc::new(ChromiumPdf::new(config.chrome_bin.clone())) as Arc<dyn PdfRenderer>, None),
        };

        let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
            Arc::new(DatabaseCheck::new(db_pool.clone())),
            Arc::new(AiServiceCheck::new(generator.is_configured())),
            Arc::new(StripeCheck::new(config.stripe_webhook_secret.is_some())),
            Arc::new(StorageCheck::new(env::temp_dir(), fonts_dir)),
        ];

        let state = Self::from_parts(StateParts {
            users: Arc::new(UserRepository::new(db_pool.clone())),
            documents: Arc::new(DocumentRepository::new(db_pool.clone())),
            billing: Arc::new(BillingRepository::new(db_pool.clone())),
            generator: Arc::new(generator),
            pdf,
            health_checks,
            jwt_secret: config.jwt_secret.clone(),
            session_max_age_days: config.session_max_age_days,
            stripe_webhook_secret: config.stripe_webhook_secret.clone(),
            stripe_prices: config.stripe_prices.clone(),
        });

        tracing::info!(pdf_engine = state.export_service.pdf_engine(), "Serviços inicializados");
        Ok((state, db_pool))
    }
}
