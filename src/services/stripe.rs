// src/services/stripe.rs
//
// Webhook do Stripe: verificação da assinatura e sincronização da assinatura
// do usuário. Checkout e portal de cobrança ficam fora deste serviço.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::billing::{Plan, SubscriptionStatus, SubscriptionUpdate};
use crate::services::subscription::SubscriptionService;

type HmacSha256 = Hmac<Sha256>;

/// Janela aceita entre o timestamp assinado e o relógio local.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("Missing Stripe-Signature header")]
    MissingSignature,
    #[error("Malformed Stripe-Signature header")]
    MalformedSignature,
    #[error("Webhook signature verification failed")]
    SignatureMismatch,
    #[error("Webhook timestamp outside the tolerance zone")]
    TimestampOutOfTolerance,
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("Webhook event is missing {0}")]
    MissingField(&'static str),
    #[error("Invalid webhook secret")]
    InvalidKey,
}

impl StripeError {
    /// Problemas da requisição (400) versus configuração do servidor (500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StripeError::InvalidKey)
    }
}

fn signature_for(secret: &str, timestamp: i64, payload: &[u8]) -> Result<HmacSha256, StripeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| StripeError::InvalidKey)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Monta um header `Stripe-Signature` válido (usado em testes e ferramentas locais).
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, StripeError> {
    let mac = signature_for(secret, timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes())))
}

/// Verifica `t=...,v1=...` contra HMAC-SHA256 de `"{t}.{payload}"`.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str, now: i64) -> Result<(), StripeError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            // Assinaturas em hex inválido são ignoradas, como as de outros esquemas
            "v1" => candidates.extend(hex::decode(value).ok()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(StripeError::MalformedSignature)?;
    if candidates.is_empty() {
        return Err(StripeError::MalformedSignature);
    }

    let matched = candidates.iter().any(|candidate| {
        signature_for(secret, timestamp, payload)
            .map(|mac| mac.verify_slice(candidate).is_ok())
            .unwrap_or(false)
    });
    if !matched {
        // Distingue chave inválida de assinatura errada
        signature_for(secret, timestamp, payload)?;
        return Err(StripeError::SignatureMismatch);
    }

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(StripeError::TimestampOutOfTolerance);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Value,
}

/// Mapeia os IDs de preço do Stripe para os planos.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    pub pro: Option<String>,
    pub enterprise: Option<String>,
}

impl PriceTable {
    pub fn plan_for(&self, price_id: &str) -> Option<Plan> {
        if self.pro.as_deref() == Some(price_id) {
            Some(Plan::Pro)
        } else if self.enterprise.as_deref() == Some(price_id) {
            Some(Plan::Enterprise)
        } else {
            None
        }
    }
}

pub fn map_status(status: &str) -> Option<SubscriptionStatus> {
    match status {
        "active" | "trialing" => Some(SubscriptionStatus::Active),
        "canceled" => Some(SubscriptionStatus::Canceled),
        "past_due" | "unpaid" => Some(SubscriptionStatus::PastDue),
        "incomplete" | "incomplete_expired" => Some(SubscriptionStatus::Incomplete),
        _ => None,
    }
}

fn parse_plan(raw: &str) -> Option<Plan> {
    match raw.to_ascii_uppercase().as_str() {
        "FREE" => Some(Plan::Free),
        "PRO" => Some(Plan::Pro),
        "ENTERPRISE" => Some(Plan::Enterprise),
        _ => None,
    }
}

fn str_field<'a>(object: &'a Value, pointer: &str) -> Option<&'a str> {
    object.pointer(pointer).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn timestamp_field(object: &Value, pointer: &str) -> Option<DateTime<Utc>> {
    object
        .pointer(pointer)
        .and_then(Value::as_i64)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

fn user_id_from(object: &Value) -> Option<Uuid> {
    str_field(object, "/client_reference_id")
        .or_else(|| str_field(object, "/metadata/userId"))
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Sem segredo configurado o webhook não faz nada.
    Disabled,
    Processed(String),
    Ignored(String),
}

#[derive(Clone)]
pub struct StripeWebhookService {
    secret: Option<String>,
    prices: PriceTable,
    subscriptions: SubscriptionService,
}

impl StripeWebhookService {
    pub fn new(secret: Option<String>, prices: PriceTable, subscriptions: SubscriptionService) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            prices,
            subscriptions,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub async fn handle(&self, signature: Option<&str>, payload: &[u8]) -> Result<WebhookOutcome, AppError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(WebhookOutcome::Disabled);
        };

        let header = signature.ok_or(StripeError::MissingSignature)?;
        verify_signature(payload, header, secret, Utc::now().timestamp())?;

        let event: StripeEvent = serde_json::from_slice(payload).map_err(StripeError::from)?;
        tracing::info!(event_id = %event.id, event_type = %event.event_type, "💳 Evento do Stripe recebido");

        let object = &event.data.object;
        match event.event_type.as_str() {
            "checkout.session.completed" => self.checkout_completed(object).await?,
            "customer.subscription.updated" => self.subscription_updated(object).await?,
            "customer.subscription.deleted" => self.subscription_deleted(object).await?,
            other => {
                tracing::info!(event_type = %other, "Evento do Stripe ignorado");
                return Ok(WebhookOutcome::Ignored(other.to_string()));
            }
        }

        Ok(WebhookOutcome::Processed(event.event_type))
    }

    async fn checkout_completed(&self, object: &Value) -> Result<(), AppError> {
        let user_id = user_id_from(object).ok_or(StripeError::MissingField("client_reference_id"))?;

        let plan = str_field(object, "/metadata/plan")
            .and_then(parse_plan)
            .or_else(|| str_field(object, "/metadata/priceId").and_then(|p| self.prices.plan_for(p)));

        self.subscriptions
            .update_subscription(
                user_id,
                SubscriptionUpdate {
                    stripe_customer_id: str_field(object, "/customer").map(str::to_string),
                    stripe_subscription_id: str_field(object, "/subscription").map(str::to_string),
                    stripe_price_id: str_field(object, "/metadata/priceId").map(str::to_string),
                    plan,
                    status: Some(SubscriptionStatus::Active),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(%user_id, ?plan, "Checkout concluído");
        Ok(())
    }

    // Assinatura é localizada pelo userId nos metadados ou pelo ID do Stripe
    async fn owner_of(&self, object: &Value) -> Result<Option<Uuid>, AppError> {
        if let Some(user_id) = user_id_from(object) {
            return Ok(Some(user_id));
        }
        let Some(stripe_id) = str_field(object, "/id") else {
            return Ok(None);
        };
        Ok(self
            .subscriptions
            .find_by_stripe_subscription(stripe_id)
            .await?
            .map(|sub| sub.user_id))
    }

    async fn subscription_updated(&self, object: &Value) -> Result<(), AppError> {
        let Some(user_id) = self.owner_of(object).await? else {
            tracing::warn!("Assinatura do Stripe sem usuário correspondente");
            return Ok(());
        };

        let price_id = str_field(object, "/items/data/0/price/id");
        let update = SubscriptionUpdate {
            stripe_customer_id: str_field(object, "/customer").map(str::to_string),
            stripe_subscription_id: str_field(object, "/id").map(str::to_string),
            stripe_price_id: price_id.map(str::to_string),
            plan: price_id.and_then(|p| self.prices.plan_for(p)),
            status: str_field(object, "/status").and_then(map_status),
            current_period_start: timestamp_field(object, "/current_period_start"),
            current_period_end: timestamp_field(object, "/current_period_end"),
            cancel_at_period_end: object.pointer("/cancel_at_period_end").and_then(Value::as_bool),
        };

        self.subscriptions.update_subscription(user_id, update).await?;
        tracing::info!(%user_id, "Assinatura atualizada pelo Stripe");
        Ok(())
    }

    async fn subscription_deleted(&self, object: &Value) -> Result<(), AppError> {
        let Some(user_id) = self.owner_of(object).await? else {
            tracing::warn!("Cancelamento do Stripe sem usuário correspondente");
            return Ok(());
        };

        self.subscriptions
            .update_subscription(
                user_id,
                SubscriptionUpdate {
                    plan: Some(Plan::Free),
                    status: Some(SubscriptionStatus::Canceled),
                    cancel_at_period_end: Some(false),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(%user_id, "Assinatura cancelada, usuário volta ao plano FREE");
        Ok(())
    }
}
