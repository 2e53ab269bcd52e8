// src/db/document_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::store::DocumentStore;
use crate::models::document::{DashboardStats, Document, DocumentKind, DocumentSummary, NewDocument};

const DOCUMENT_COLUMNS: &str = "id, user_id, kind, client_name, client_company, project_title, \
     content, metadata, created_at, updated_at";

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn insert(&self, document: NewDocument) -> Result<Document, AppError> {
        let sql = format!(
            r#"
            INSERT INTO documents (
                id, user_id, kind, client_name, client_company, project_title, content, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        );

        let doc = sqlx::query_as::<_, Document>(&sql)
            .bind(&document.id)
            .bind(document.user_id)
            .bind(document.kind)
            .bind(&document.client_name)
            .bind(&document.client_company)
            .bind(&document.project_title)
            .bind(&document.content)
            .bind(&document.metadata)
            .fetch_one(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn delete_for_user(&self, id: &str, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_for_user(
        &self,
        id: &str,
        user_id: Uuid,
        kind: Option<DocumentKind>,
    ) -> Result<Option<Document>, AppError> {
        // O filtro por user_id é o que garante o isolamento entre usuários
        let sql = format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE id = $1 AND user_id = $2 AND ($3::document_kind IS NULL OR kind = $3)
            "#
        );

        let doc = sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(kind)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<DocumentKind>,
        limit: i64,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        let docs = sqlx::query_as::<_, DocumentSummary>(
            r#"
            SELECT id, kind, client_name, client_company, project_title, created_at
            FROM documents
            WHERE user_id = $1 AND ($2::document_kind IS NULL OR kind = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs)
    }

    async fn stats_for_user(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<DashboardStats, AppError> {
        let (total_documents, this_month): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE created_at >= $2)
            FROM documents
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats { total_documents, this_month })
    }
}
