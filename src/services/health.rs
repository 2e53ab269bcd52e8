// src/services/health.rs
//
// Verificações de saúde: banco, provedor de IA, Stripe e armazenamento local.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: HealthStatus,
    /// Milissegundos gastos na verificação.
    pub response_time: u64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

/// Resultado de uma verificação antes de medir o tempo.
#[derive(Debug, Clone)]
pub struct Probe {
    pub status: HealthStatus,
    pub message: String,
    pub details: Option<Value>,
}

impl Probe {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self { status: HealthStatus::Healthy, message: message.into(), details: None }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self { status: HealthStatus::Degraded, message: message.into(), details: None }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self { status: HealthStatus::Unhealthy, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;
    async fn probe(&self) -> Probe;
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub checks: BTreeMap<String, CheckResult>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[derive(Clone, Default)]
pub struct HealthService {
    checks: Vec<Arc<dyn HealthCheck>>,
}

impl HealthService {
    pub fn new(checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self { checks }
    }

    /// Tudo `healthy` → relatório `healthy`; qualquer outra coisa → `unhealthy`.
    pub async fn run(&self) -> HealthReport {
        let mut checks = BTreeMap::new();

        for check in &self.checks {
            let started = Instant::now();
            let probe = check.probe().await;
            let response_time = started.elapsed().as_millis() as u64;

            if probe.status != HealthStatus::Healthy {
                tracing::warn!(check = check.name(), status = ?probe.status, message = %probe.message, "Health check falhou");
            }

            checks.insert(
                check.name().to_string(),
                CheckResult {
                    status: probe.status,
                    response_time,
                    message: probe.message,
                    details: probe.details,
                },
            );
        }

        let all_healthy = checks.values().all(|c| c.status == HealthStatus::Healthy);
        HealthReport {
            status: if all_healthy { HealthStatus::Healthy } else { HealthStatus::Unhealthy },
            timestamp: Utc::now(),
            checks,
        }
    }
}

// --- Verificações concretas ---

pub struct DatabaseCheck {
    pool: PgPool,
}

impl DatabaseCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn probe(&self) -> Probe {
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Probe::healthy("Database connection successful"),
            Err(e) => {
                tracing::error!("🔥 Banco indisponível: {}", e);
                Probe::unhealthy("Database connection failed")
            }
        }
    }
}

pub struct AiServiceCheck {
    configured: bool,
}

impl AiServiceCheck {
    pub fn new(configured: bool) -> Self {
        Self { configured }
    }
}

#[async_trait]
impl HealthCheck for AiServiceCheck {
    fn name(&self) -> &'static str {
        "ai_service"
    }

    async fn probe(&self) -> Probe {
        if self.configured {
            Probe::healthy("AI service operational")
        } else {
            Probe::degraded("AI provider API key is not configured")
        }
    }
}

pub struct StripeCheck {
    webhook_enabled: bool,
}

impl StripeCheck {
    pub fn new(webhook_enabled: bool) -> Self {
        Self { webhook_enabled }
    }
}

#[async_trait]
impl HealthCheck for StripeCheck {
    fn name(&self) -> &'static str {
        "stripe"
    }

    // Sem o segredo o webhook é um no-op previsto, não uma falha
    async fn probe(&self) -> Probe {
        let message = if self.webhook_enabled {
            "Stripe webhook verification enabled"
        } else {
            "Stripe webhook disabled"
        };
        Probe::healthy(message).with_details(json!({ "webhookEnabled": self.webhook_enabled }))
    }
}

/// Diretório temporário gravável e, no motor nativo, a pasta de fontes.
pub struct StorageCheck {
    temp_dir: PathBuf,
    fonts_dir: Option<PathBuf>,
}

impl StorageCheck {
    pub fn new(temp_dir: PathBuf, fonts_dir: Option<PathBuf>) -> Self {
        Self { temp_dir, fonts_dir }
    }
}

#[async_trait]
impl HealthCheck for StorageCheck {
    fn name(&self) -> &'static str {
        "storage"
    }

    async fn probe(&self) -> Probe {
        let probe_file = self.temp_dir.join(format!(".pitchgenie-health-{}", Uuid::new_v4()));
        let writable = tokio::fs::write(&probe_file, b"ok").await.is_ok();
        if writable {
            let _ = tokio::fs::remove_file(&probe_file).await;
        }

        let fonts_ok = match &self.fonts_dir {
            Some(dir) => tokio::fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false),
            None => true,
        };

        let details = json!({
            "tempDir": self.temp_dir.display().to_string(),
            "tempWritable": writable,
            "fontsDir": self.fonts_dir.as_ref().map(|d| d.display().to_string()),
            "fontsAvailable": fonts_ok,
        });

        let probe = if !writable {
            Probe::unhealthy("Temporary directory is not writable")
        } else if !fonts_ok {
            Probe::degraded("Fonts directory not found")
        } else {
            Probe::healthy("Storage operational")
        };
        probe.with_details(details)
    }
}
