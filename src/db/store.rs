// src/db/store.rs
//
// Contratos de persistência usados pelos serviços. Em produção são os
// repositórios Postgres; nos testes, implementações em memória.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::auth::{NewUser, User};
use crate::models::billing::{Subscription, SubscriptionUpdate, Usage, UsageKind};
use crate::models::document::{DashboardStats, Document, DocumentKind, DocumentSummary, NewDocument};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    /// Falha com `EmailAlreadyExists` quando o e-mail já está cadastrado.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, document: NewDocument) -> Result<Document, AppError>;

    /// Remove um documento do próprio usuário. `false` se não havia nada.
    async fn delete_for_user(&self, id: &str, user_id: Uuid) -> Result<bool, AppError>;

    /// Busca sempre filtrada pelo dono; documento de outro usuário é `None`.
    async fn find_for_user(
        &self,
        id: &str,
        user_id: Uuid,
        kind: Option<DocumentKind>,
    ) -> Result<Option<Document>, AppError>;

    /// Mais recentes primeiro.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<DocumentKind>,
        limit: i64,
    ) -> Result<Vec<DocumentSummary>, AppError>;

    async fn stats_for_user(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<DashboardStats, AppError>;
}

#[async_trait]
pub trait BillingStore: Send + Sync {
    async fn find_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError>;

    /// Cria a assinatura FREE/active se não existir e devolve a linha atual.
    async fn ensure_subscription(&self, user_id: Uuid) -> Result<Subscription, AppError>;

    async fn find_subscription_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError>;

    async fn upsert_subscription(
        &self,
        user_id: Uuid,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, AppError>;

    /// Lê ou cria (zerada) a linha de uso do mês.
    async fn ensure_usage(&self, user_id: Uuid, month: &str) -> Result<Usage, AppError>;

    /// Soma 1 ao contador, criando a linha com 1 se não existir.
    async fn increment_usage(&self, user_id: Uuid, month: &str, kind: UsageKind) -> Result<Usage, AppError>;

    /// Incremento condicional atômico: só soma enquanto `contador < limit`.
    /// `limit = None` é ilimitado. Devolve `None` quando o limite já foi atingido.
    async fn try_consume(
        &self,
        user_id: Uuid,
        month: &str,
        kind: UsageKind,
        limit: Option<i32>,
    ) -> Result<Option<Usage>, AppError>;
}
