// src/services/subscription.rs
//
// Assinatura, contadores mensais e a regra de bloqueio de geração.

use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::BillingStore;
use crate::models::billing::{BillingOverview, Subscription, SubscriptionUpdate, Usage, UsageKind};

/// Mês corrente em UTC no formato `YYYY-MM`.
pub fn current_month() -> String {
    month_key(Utc::now())
}

pub fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

/// Primeiro instante do mês de `at` (UTC).
pub fn month_start(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(at)
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn BillingStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Cria a assinatura FREE na primeira consulta.
    pub async fn get_user_subscription(&self, user_id: Uuid) -> Result<Subscription, AppError> {
        if let Some(sub) = self.store.find_subscription(user_id).await? {
            return Ok(sub);
        }
        self.store.ensure_subscription(user_id).await
    }

    pub async fn get_user_usage(&self, user_id: Uuid) -> Result<Usage, AppError> {
        self.store.ensure_usage(user_id, &current_month()).await
    }

    pub async fn can_user_generate(&self, user_id: Uuid, kind: UsageKind) -> Result<bool, AppError> {
        let subscription = self.get_user_subscription(user_id).await?;
        let usage = self.get_user_usage(user_id).await?;
        Ok(subscription.plan.limits().allows(kind, usage.count(kind)))
    }

    pub async fn increment_usage(&self, user_id: Uuid, kind: UsageKind) -> Result<Usage, AppError> {
        self.store.increment_usage(user_id, &current_month(), kind).await
    }

    /// Verifica e consome uma geração numa única operação atômica.
    pub async fn consume_generation(&self, user_id: Uuid, kind: UsageKind) -> Result<Usage, AppError> {
        let subscription = self.get_user_subscription(user_id).await?;
        let limit = subscription.plan.limits().finite_limit(kind);

        match self.store.try_consume(user_id, &current_month(), kind, limit).await? {
            Some(usage) => Ok(usage),
            None => {
                tracing::warn!(%user_id, ?kind, "Limite de uso atingido na confirmação");
                Err(AppError::UsageLimitReached(kind))
            }
        }
    }

    pub async fn update_subscription(
        &self,
        user_id: Uuid,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, AppError> {
        self.store.upsert_subscription(user_id, update).await
    }

    pub async fn find_by_stripe_subscription(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        self.store.find_subscription_by_stripe_id(stripe_subscription_id).await
    }

    pub async fn overview(&self, user_id: Uuid) -> Result<BillingOverview, AppError> {
        let subscription = self.get_user_subscription(user_id).await?;
        let usage = self.get_user_usage(user_id).await?;
        let limits = subscription.plan.limits();
        Ok(BillingOverview { subscription, usage, limits })
    }
}
