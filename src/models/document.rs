// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value; // metadata fica em JSONB
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::billing::{Subscription, Usage};

// Mapeia o CREATE TYPE document_kind do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "document_kind", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Proposal,
    PitchDeck,
}

impl DocumentKind {
    pub fn id_prefix(self) -> &'static str {
        match self {
            DocumentKind::Proposal => "prop",
            DocumentKind::PitchDeck => "deck",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            DocumentKind::Proposal => "Proposal not found",
            DocumentKind::PitchDeck => "Pitch deck not found",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: DocumentKind,

    // Para pitch decks: nome da startup
    pub client_name: String,
    pub client_company: Option<String>,
    // Para pitch decks: tagline (ou o nome da startup)
    pub project_title: String,

    pub content: String,
    #[schema(value_type = Object)]
    pub metadata: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub id: String,
    pub user_id: Uuid,
    pub kind: DocumentKind,
    pub client_name: String,
    pub client_company: Option<String>,
    pub project_title: String,
    pub content: String,
    pub metadata: Value,
}

/// Listagem sem o conteúdo (que pode ser grande).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub client_name: String,
    pub client_company: Option<String>,
    pub project_title: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            kind: doc.kind,
            client_name: doc.client_name.clone(),
            client_company: doc.client_company.clone(),
            project_title: doc.project_title.clone(),
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_documents: i64,
    pub this_month: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub recent_documents: Vec<DocumentSummary>,
    pub stats: DashboardStats,
    pub subscription: Subscription,
    pub usage: Usage,
}
