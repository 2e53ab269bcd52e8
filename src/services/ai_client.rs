// src/services/ai_client.rs
//
// Cliente mínimo para a API de chat completions do OpenRouter
// (compatível com OpenAI) e a tabela de modelos por preferência.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::generation::{Complexity, ModelPreference};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Modelos gratuitos do OpenRouter por preferência
pub const PRIMARY_MODEL: &str = "meta-llama/llama-3.1-8b-instruct:free";
pub const FALLBACK_MODEL: &str = "google/gemma-2-9b-it:free";
pub const LIGHTWEIGHT_MODEL: &str = "deepseek/deepseek-r1-distill-llama-70b:free";
pub const VISUAL_MODEL: &str = "google/gemini-2.5-flash-image-preview:free";

pub fn model_for(preference: ModelPreference) -> &'static str {
    match preference {
        ModelPreference::Primary => PRIMARY_MODEL,
        ModelPreference::Fallback => FALLBACK_MODEL,
        ModelPreference::Lightweight => LIGHTWEIGHT_MODEL,
        ModelPreference::Visual => VISUAL_MODEL,
    }
}

/// Preferência explícita vence; sem ela, a complexidade decide.
pub fn select_model(preference: Option<ModelPreference>, complexity: Complexity) -> &'static str {
    match (preference, complexity) {
        (Some(preference), _) => model_for(preference),
        (None, Complexity::Simple) => LIGHTWEIGHT_MODEL,
        (None, Complexity::Complex) => PRIMARY_MODEL,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Empty completion from model {0}")]
    EmptyCompletion(String),
    #[error("AI provider is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub total_tokens: u32,
}

/// Ponto de troca do provedor de texto (o OpenRouter em produção, roteiros nos testes).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion, AiError>;

    /// Se há credenciais para chamar o provedor.
    fn is_configured(&self) -> bool {
        true
    }
}

// --- Formato do wire (chat completions) ---

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: Option<u32>,
}

/// Cliente do OpenRouter com `reqwest::Client` reutilizável.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<Arc<String>>,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent("pitchgenie/0.1")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()).map(Arc::new),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TextGenerator for OpenRouterClient {
    async fn generate(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        let api_key = self.api_key.as_ref().ok_or(AiError::NotConfigured)?;
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatCompletionBody {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion = response.json::<ChatCompletionResponse>().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AiError::EmptyCompletion(request.model.clone()))?;

        Ok(Completion {
            text,
            total_tokens: completion.usage.and_then(|u| u.total_tokens).unwrap_or(0),
        })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
