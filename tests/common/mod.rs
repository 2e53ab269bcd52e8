// tests/common/mod.rs
//
// App completo sobre stores em memória, gerador roteirizado e PDF falso.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use pitchgenie::{
    build_router,
    common::error::AppError,
    config::{AppState, StateParts},
    db::{BillingStore, DocumentStore, UserStore},
    models::{
        auth::{NewUser, User},
        billing::{Plan, Subscription, SubscriptionStatus, SubscriptionUpdate, Usage, UsageKind},
        document::{DashboardStats, Document, DocumentKind, DocumentSummary, NewDocument},
    },
    services::{
        ai_client::{AiError, Completion, CompletionRequest, TextGenerator},
        export::{
            pdf::{PdfJob, PdfRenderer},
            ExportError,
        },
        health::{AiServiceCheck, HealthCheck, HealthStatus, Probe, StripeCheck},
        stripe::PriceTable,
    },
};

pub const JWT_SECRET: &str = "test-secret";
pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const PRO_PRICE: &str = "price_pro_monthly";
pub const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";

// --- Stores ---

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            name: new_user.name,
            image: None,
            email_verified: None,
            password_hash: Some(new_user.password_hash),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryDocuments {
    documents: Mutex<Vec<Document>>,
    /// Simula o banco recusando gravações.
    pub fail_inserts: bool,
}

impl MemoryDocuments {
    pub fn all(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    pub fn push(&self, document: Document) {
        self.documents.lock().unwrap().push(document);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocuments {
    async fn insert(&self, document: NewDocument) -> Result<Document, AppError> {
        if self.fail_inserts {
            return Err(AppError::InternalServerError(anyhow::anyhow!("documents table unavailable")));
        }
        let now = Utc::now();
        let stored = Document {
            id: document.id,
            user_id: document.user_id,
            kind: document.kind,
            client_name: document.client_name,
            client_company: document.client_company,
            project_title: document.project_title,
            content: document.content,
            metadata: document.metadata,
            created_at: now,
            updated_at: now,
        };
        self.documents.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete_for_user(&self, id: &str, user_id: Uuid) -> Result<bool, AppError> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| !(d.id == id && d.user_id == user_id));
        Ok(documents.len() < before)
    }

    async fn find_for_user(
        &self,
        id: &str,
        user_id: Uuid,
        kind: Option<DocumentKind>,
    ) -> Result<Option<Document>, AppError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id && d.user_id == user_id && kind.is_none_or(|k| d.kind == k))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        kind: Option<DocumentKind>,
        limit: i64,
    ) -> Result<Vec<DocumentSummary>, AppError> {
        let documents = self.documents.lock().unwrap();
        let mut owned: Vec<&Document> = documents
            .iter()
            .filter(|d| d.user_id == user_id && kind.is_none_or(|k| d.kind == k))
            .collect();
        // Inserção mais nova por último; empate de timestamp resolvido pela ordem
        owned.reverse();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned.into_iter().take(limit as usize).map(DocumentSummary::from).collect())
    }

    async fn stats_for_user(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<DashboardStats, AppError> {
        let documents = self.documents.lock().unwrap();
        let owned: Vec<&Document> = documents.iter().filter(|d| d.user_id == user_id).collect();
        Ok(DashboardStats {
            total_documents: owned.len() as i64,
            this_month: owned.iter().filter(|d| d.created_at >= since).count() as i64,
        })
    }
}

#[derive(Default)]
pub struct MemoryBilling {
    subscriptions: Mutex<HashMap<Uuid, Subscription>>,
    usage: Mutex<HashMap<(Uuid, String), Usage>>,
}

fn free_subscription(user_id: Uuid) -> Subscription {
    let now = Utc::now();
    Subscription {
        user_id,
        stripe_customer_id: None,
        stripe_subscription_id: None,
        stripe_price_id: None,
        plan: Plan::Free,
        status: SubscriptionStatus::Active,
        current_period_start: None,
        current_period_end: None,
        cancel_at_period_end: false,
        created_at: now,
        updated_at: now,
    }
}

fn bump(usage: &mut Usage, kind: UsageKind) {
    match kind {
        UsageKind::Proposals => usage.proposals += 1,
        UsageKind::PitchDecks => usage.pitch_decks += 1,
    }
}

impl MemoryBilling {
    pub fn set_usage(&self, user_id: Uuid, month: &str, proposals: i32, pitch_decks: i32) {
        self.usage.lock().unwrap().insert(
            (user_id, month.to_string()),
            Usage { user_id, month: month.to_string(), proposals, pitch_decks },
        );
    }

    pub fn usage_of(&self, user_id: Uuid, month: &str) -> Option<Usage> {
        self.usage.lock().unwrap().get(&(user_id, month.to_string())).cloned()
    }

    pub fn subscription_of(&self, user_id: Uuid) -> Option<Subscription> {
        self.subscriptions.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl BillingStore for MemoryBilling {
    async fn find_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
        Ok(self.subscription_of(user_id))
    }

    async fn ensure_subscription(&self, user_id: Uuid) -> Result<Subscription, AppError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .entry(user_id)
            .or_insert_with(|| free_subscription(user_id))
            .clone())
    }

    async fn find_subscription_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.stripe_subscription_id.as_deref() == Some(stripe_subscription_id))
            .cloned())
    }

    async fn upsert_subscription(&self, user_id: Uuid, update: SubscriptionUpdate) -> Result<Subscription, AppError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let sub = subscriptions.entry(user_id).or_insert_with(|| free_subscription(user_id));

        if let Some(v) = update.stripe_customer_id {
            sub.stripe_customer_id = Some(v);
        }
        if let Some(v) = update.stripe_subscription_id {
            sub.stripe_subscription_id = Some(v);
        }
        if let Some(v) = update.stripe_price_id {
            sub.stripe_price_id = Some(v);
        }
        if let Some(v) = update.plan {
            sub.plan = v;
        }
        if let Some(v) = update.status {
            sub.status = v;
        }
        if let Some(v) = update.current_period_start {
            sub.current_period_start = Some(v);
        }
        if let Some(v) = update.current_period_end {
            sub.current_period_end = Some(v);
        }
        if let Some(v) = update.cancel_at_period_end {
            sub.cancel_at_period_end = v;
        }
        sub.updated_at = Utc::now();
        Ok(sub.clone())
    }

    async fn ensure_usage(&self, user_id: Uuid, month: &str) -> Result<Usage, AppError> {
        Ok(self
            .usage
            .lock()
            .unwrap()
            .entry((user_id, month.to_string()))
            .or_insert_with(|| Usage { user_id, month: month.to_string(), proposals: 0, pitch_decks: 0 })
            .clone())
    }

    async fn increment_usage(&self, user_id: Uuid, month: &str, kind: UsageKind) -> Result<Usage, AppError> {
        let mut usage = self.usage.lock().unwrap();
        let row = usage
            .entry((user_id, month.to_string()))
            .or_insert_with(|| Usage { user_id, month: month.to_string(), proposals: 0, pitch_decks: 0 });
        bump(row, kind);
        Ok(row.clone())
    }

    async fn try_consume(
        &self,
        user_id: Uuid,
        month: &str,
        kind: UsageKind,
        limit: Option<i32>,
    ) -> Result<Option<Usage>, AppError> {
        let mut usage = self.usage.lock().unwrap();
        let row = usage
            .entry((user_id, month.to_string()))
            .or_insert_with(|| Usage { user_id, month: month.to_string(), proposals: 0, pitch_decks: 0 });

        if limit.is_some_and(|l| row.count(kind) >= l) {
            return Ok(None);
        }
        bump(row, kind);
        Ok(Some(row.clone()))
    }
}

// --- Gerador e PDF ---

/// Sem roteiro, toda chamada responde com sucesso.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<Completion, AiError>>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGenerator {
    pub fn push_ok(&self, text: &str, tokens: u32) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Completion { text: text.into(), total_tokens: tokens }));
    }

    pub fn push_failure(&self, status: u16) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(AiError::Api { status, message: "provider unavailable".into() }));
    }

    pub fn seen(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        self.seen.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(Completion { text: "# Generated\n\nContent".into(), total_tokens: 321 })
        })
    }
}

#[derive(Default)]
pub struct FakePdf {
    pub jobs: Mutex<Vec<PdfJob>>,
    pub fail: bool,
}

#[async_trait]
impl PdfRenderer for FakePdf {
    fn engine(&self) -> &'static str {
        "fake"
    }

    async fn render(&self, job: PdfJob) -> Result<Vec<u8>, ExportError> {
        self.jobs.lock().unwrap().push(job);
        if self.fail {
            return Err(ExportError::Render("engine crashed".into()));
        }
        Ok(FAKE_PDF.to_vec())
    }
}

pub struct FixedCheck(pub &'static str, pub HealthStatus);

#[async_trait]
impl HealthCheck for FixedCheck {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn probe(&self) -> Probe {
        Probe { status: self.1, message: format!("{} fixed", self.0), details: None }
    }
}

// --- App ---

pub struct TestAppOptions {
    pub webhook_secret: Option<String>,
    pub database: HealthStatus,
    pub ai_configured: bool,
    pub pdf_fails: bool,
    pub document_inserts_fail: bool,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            database: HealthStatus::Healthy,
            ai_configured: true,
            pdf_fails: false,
            document_inserts_fail: false,
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUsers>,
    pub documents: Arc<MemoryDocuments>,
    pub billing: Arc<MemoryBilling>,
    pub generator: Arc<ScriptedGenerator>,
    pub pdf: Arc<FakePdf>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(TestAppOptions::default())
    }

    pub fn with_options(options: TestAppOptions) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let documents = Arc::new(MemoryDocuments {
            fail_inserts: options.document_inserts_fail,
            ..Default::default()
        });
        let billing = Arc::new(MemoryBilling::default());
        let generator = Arc::new(ScriptedGenerator::default());
        let pdf = Arc::new(FakePdf { jobs: Mutex::new(Vec::new()), fail: options.pdf_fails });

        let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
            Arc::new(FixedCheck("database", options.database)),
            Arc::new(AiServiceCheck::new(options.ai_configured)),
            Arc::new(StripeCheck::new(options.webhook_secret.is_some())),
            Arc::new(FixedCheck("storage", HealthStatus::Healthy)),
        ];

        let state = AppState::from_parts(StateParts {
            users: users.clone(),
            documents: documents.clone(),
            billing: billing.clone(),
            generator: generator.clone(),
            pdf: pdf.clone(),
            health_checks,
            jwt_secret: JWT_SECRET.to_string(),
            session_max_age_days: 30,
            stripe_webhook_secret: options.webhook_secret,
            stripe_prices: PriceTable { pro: Some(PRO_PRICE.to_string()), enterprise: None },
        });

        Self {
            router: build_router(state.clone()),
            state,
            users,
            documents,
            billing,
            generator,
            pdf,
        }
    }

    /// Registra um usuário e devolve (token, id).
    pub async fn signed_in_user(&self, email: &str) -> (String, Uuid) {
        let user = self
            .state
            .auth_service
            .register(Some(email), Some("correct-horse"), Some("Test User".into()))
            .await
            .expect("registro");
        let issued = self.state.auth_service.create_token(user.id).expect("token");
        (issued.token, user.id)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("resposta do router");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("corpo");
        TestResponse { status, headers, body: body.to_vec() }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(Method::POST, uri, token, Some(body.to_string()))).await
    }

    pub fn insert_document(&self, kind: DocumentKind, owner: Uuid, id: &str, title: &str, content: &str) {
        let now = Utc::now();
        self.documents.push(Document {
            id: id.to_string(),
            user_id: owner,
            kind,
            client_name: "Acme Robotics".into(),
            client_company: None,
            project_title: title.to_string(),
            content: content.to_string(),
            metadata: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        });
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("corpo JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
