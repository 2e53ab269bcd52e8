// src/db/billing_repo.rs
//
// Assinaturas (uma linha por usuário) e contadores mensais de uso.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::store::BillingStore;
use crate::models::billing::{Subscription, SubscriptionUpdate, Usage, UsageKind};

const SUBSCRIPTION_COLUMNS: &str = "user_id, stripe_customer_id, stripe_subscription_id, stripe_price_id, \
     plan, status, current_period_start, current_period_end, cancel_at_period_end, created_at, updated_at";

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingStore for BillingRepository {
    async fn find_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
        let sql = format!("SELECT {SUBSCRIPTION_COLUMNS} FROM user_subscriptions WHERE user_id = $1");
        let sub = sqlx::query_as::<_, Subscription>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sub)
    }

    async fn ensure_subscription(&self, user_id: Uuid) -> Result<Subscription, AppError> {
        // O "DO UPDATE" sem mudança real garante que o RETURNING sempre devolve a linha
        let sql = format!(
            r#"
            INSERT INTO user_subscriptions (user_id, plan, status)
            VALUES ($1, 'FREE', 'active')
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        );
        let sub = sqlx::query_as::<_, Subscription>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(sub)
    }

    async fn find_subscription_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM user_subscriptions WHERE stripe_subscription_id = $1"
        );
        let sub = sqlx::query_as::<_, Subscription>(&sql)
            .bind(stripe_subscription_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sub)
    }

    async fn upsert_subscription(
        &self,
        user_id: Uuid,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, AppError> {
        // Campos NULL mantêm o valor atual (ou o padrão na criação)
        let sql = format!(
            r#"
            INSERT INTO user_subscriptions (
                user_id, stripe_customer_id, stripe_subscription_id, stripe_price_id,
                plan, status, current_period_start, current_period_end, cancel_at_period_end
            )
            VALUES (
                $1, $2, $3, $4,
                COALESCE($5, 'FREE'::subscription_plan),
                COALESCE($6, 'active'::subscription_status),
                $7, $8, COALESCE($9, FALSE)
            )
            ON CONFLICT (user_id) DO UPDATE SET
                stripe_customer_id = COALESCE($2, user_subscriptions.stripe_customer_id),
                stripe_subscription_id = COALESCE($3, user_subscriptions.stripe_subscription_id),
                stripe_price_id = COALESCE($4, user_subscriptions.stripe_price_id),
                plan = COALESCE($5, user_subscriptions.plan),
                status = COALESCE($6, user_subscriptions.status),
                current_period_start = COALESCE($7, user_subscriptions.current_period_start),
                current_period_end = COALESCE($8, user_subscriptions.current_period_end),
                cancel_at_period_end = COALESCE($9, user_subscriptions.cancel_at_period_end),
                updated_at = NOW()
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        );

        let sub = sqlx::query_as::<_, Subscription>(&sql)
            .bind(user_id)
            .bind(update.stripe_customer_id)
            .bind(update.stripe_subscription_id)
            .bind(update.stripe_price_id)
            .bind(update.plan)
            .bind(update.status)
            .bind(update.current_period_start)
            .bind(update.current_period_end)
            .bind(update.cancel_at_period_end)
            .fetch_one(&self.pool)
            .await?;
        Ok(sub)
    }

    async fn ensure_usage(&self, user_id: Uuid, month: &str) -> Result<Usage, AppError> {
        let usage = sqlx::query_as::<_, Usage>(
            r#"
            INSERT INTO usage_records (user_id, month, proposals, pitch_decks)
            VALUES ($1, $2, 0, 0)
            ON CONFLICT (user_id, month) DO UPDATE SET month = EXCLUDED.month
            RETURNING user_id, month, proposals, pitch_decks
            "#,
        )
        .bind(user_id)
        .bind(month)
        .fetch_one(&self.pool)
        .await?;
        Ok(usage)
    }

    async fn increment_usage(&self, user_id: Uuid, month: &str, kind: UsageKind) -> Result<Usage, AppError> {
        let column = kind.column();
        let (proposals, pitch_decks) = initial_counters(kind);
        let sql = format!(
            r#"
            INSERT INTO usage_records (user_id, month, proposals, pitch_decks)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, month) DO UPDATE
            SET {column} = usage_records.{column} + 1
            RETURNING user_id, month, proposals, pitch_decks
            "#
        );

        let usage = sqlx::query_as::<_, Usage>(&sql)
            .bind(user_id)
            .bind(month)
            .bind(proposals)
            .bind(pitch_decks)
            .fetch_one(&self.pool)
            .await?;
        Ok(usage)
    }

    async fn try_consume(
        &self,
        user_id: Uuid,
        month: &str,
        kind: UsageKind,
        limit: Option<i32>,
    ) -> Result<Option<Usage>, AppError> {
        if matches!(limit, Some(l) if l <= 0) {
            return Ok(None);
        }

        // Um único statement: a linha fica travada durante o UPDATE, então
        // duas requisições concorrentes nunca passam juntas do limite.
        // Se o WHERE barrar o UPDATE, o RETURNING volta vazio.
        let column = kind.column();
        let (proposals, pitch_decks) = initial_counters(kind);
        let sql = format!(
            r#"
            INSERT INTO usage_records (user_id, month, proposals, pitch_decks)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, month) DO UPDATE
            SET {column} = usage_records.{column} + 1
            WHERE $5::INTEGER IS NULL OR usage_records.{column} < $5
            RETURNING user_id, month, proposals, pitch_decks
            "#
        );

        let usage = sqlx::query_as::<_, Usage>(&sql)
            .bind(user_id)
            .bind(month)
            .bind(proposals)
            .bind(pitch_decks)
            .bind(limit)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usage)
    }
}

// Valores da linha quando ela ainda não existe: 1 no contador consumido
fn initial_counters(kind: UsageKind) -> (i32, i32) {
    match kind {
        UsageKind::Proposals => (1, 0),
        UsageKind::PitchDecks => (0, 1),
    }
}
