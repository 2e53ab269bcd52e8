// src/models/generation.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_FIELD: &str = "technology";
pub const DEFAULT_PROJECT_TITLE: &str = "Custom Project";
pub const DEFAULT_TIMELINE: &str = "To be determined";

// --- ENUMS ---

/// Preferência de modelo; cada uma aponta para um modelo do OpenRouter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    Primary,
    Fallback,
    Lightweight,
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Simple,
    Complex,
}

/// Formato pedido no momento da geração do pitch deck.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Html,
}

/// Valor livre dos campos específicos da área (texto, lista ou qualquer JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
            FieldValue::Other(value) => write!(f, "{}", value),
        }
    }
}

pub type FieldSpecificData = BTreeMap<String, FieldValue>;

// O formulário manda `services` como string única ou como lista
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServicesInput {
    One(String),
    Many(Vec<String>),
}

impl Default for ServicesInput {
    fn default() -> Self {
        ServicesInput::Many(Vec::new())
    }
}

impl ServicesInput {
    pub fn into_list(self) -> Vec<String> {
        match self {
            ServicesInput::One(service) if service.is_empty() => Vec::new(),
            ServicesInput::One(service) => vec![service],
            ServicesInput::Many(services) => services,
        }
    }
}

// --- PEDIDOS PARA O SERVIÇO DE IA ---

#[derive(Debug, Clone, PartialEq)]
pub struct ProposalRequest {
    pub field: String,
    pub client_name: String,
    pub client_company: Option<String>,
    pub project_title: String,
    pub project_description: String,
    pub goals: String,
    pub budget: String,
    pub timeline: String,
    pub services: Vec<String>,
    pub field_specific_data: FieldSpecificData,
    pub model_preference: Option<ModelPreference>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitchDeckRequest {
    pub field: String,
    pub startup_name: String,
    pub tagline: Option<String>,
    pub problem: String,
    pub solution: String,
    pub market: String,
    pub business_model: Option<String>,
    pub team: Option<String>,
    pub funding: Option<String>,
    pub field_specific_data: FieldSpecificData,
    pub model_preference: Option<ModelPreference>,
    pub visual_mode: bool,
    pub export_format: Option<ExportFormat>,
}

/// Resultado de uma geração. Falhas do provedor não são `Err`: voltam com `success = false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub success: bool,
    pub content: String,
    pub model: String,
    pub tokens_used: u32,
    pub generation_time: u64, // ms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// --- PAYLOADS HTTP ---

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPayload {
    #[serde(default = "default_field")]
    #[schema(example = "technology")]
    pub field: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Client name is required."))]
    #[schema(example = "Jane Doe")]
    pub client_name: String,
    pub client_company: Option<String>,
    // Padrão: "Custom Project"
    pub project_title: Option<String>,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub budget: String,
    // Padrão: "To be determined"
    pub timeline: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub services: ServicesInput,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub field_specific_data: FieldSpecificData,
    pub model_preference: Option<ModelPreference>,
}

impl ProposalPayload {
    pub fn project_title_or_default(&self) -> String {
        non_empty(self.project_title.clone()).unwrap_or_else(|| DEFAULT_PROJECT_TITLE.to_string())
    }

    pub fn into_request(self) -> ProposalRequest {
        let project_title = self.project_title_or_default();
        ProposalRequest {
            field: self.field,
            client_name: self.client_name,
            client_company: non_empty(self.client_company),
            project_title,
            project_description: self.project_description,
            goals: self.goals,
            budget: self.budget,
            timeline: non_empty(self.timeline).unwrap_or_else(|| DEFAULT_TIMELINE.to_string()),
            services: self.services.into_list(),
            field_specific_data: self.field_specific_data,
            model_preference: self.model_preference,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeckPayload {
    #[serde(default = "default_field")]
    pub field: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Startup name is required."))]
    #[schema(example = "Acme Robotics")]
    pub startup_name: String,
    pub tagline: Option<String>,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub market: String,
    pub business_model: Option<String>,
    pub traction: Option<String>,
    pub team: Option<String>,
    pub competition: Option<String>,
    pub funding_ask: Option<String>,
    pub use_of_funds: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub field_specific_data: FieldSpecificData,
    pub model_preference: Option<ModelPreference>,
    #[serde(default)]
    pub visual_mode: bool,
    pub export_format: Option<ExportFormat>,
}

impl PitchDeckPayload {
    pub fn into_request(self) -> PitchDeckRequest {
        let mut field_specific_data = self.field_specific_data;

        // Campos extras do formulário entram como dados específicos
        for (key, value) in [
            ("traction", self.traction),
            ("competition", self.competition),
            ("useOfFunds", self.use_of_funds),
            ("industry", self.industry),
        ] {
            if let Some(value) = non_empty(value) {
                field_specific_data.insert(key.to_string(), FieldValue::Text(value));
            }
        }

        let model_preference = if self.visual_mode {
            Some(ModelPreference::Visual)
        } else {
            self.model_preference
        };

        PitchDeckRequest {
            field: self.field,
            startup_name: self.startup_name,
            tagline: non_empty(self.tagline),
            problem: self.problem,
            solution: self.solution,
            market: self.market,
            business_model: non_empty(self.business_model),
            team: non_empty(self.team),
            funding: non_empty(self.funding_ask),
            field_specific_data,
            model_preference,
            visual_mode: self.visual_mode,
            export_format: self.export_format,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub field: String,
    pub model: String,
    pub tokens_used: u32,
    pub generation_time: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationResponse {
    pub id: String,
    pub message: String,
    pub metadata: GenerationMetadata,
}
