// src/services/generation.rs
//
// Geração de propostas e pitch decks com fallback entre modelos.
// Cada pedido vira uma lista finita de tentativas; a primeira que dá certo vence.

use std::sync::Arc;
use std::time::Instant;

use crate::common::error::AppError;
use crate::models::generation::{
    Complexity, ExportFormat, GenerationOutcome, ModelPreference, PitchDeckRequest, ProposalRequest,
};
use crate::services::ai_client::{
    select_model, CompletionRequest, TextGenerator, DEFAULT_TEMPERATURE, LIGHTWEIGHT_MODEL,
    VISUAL_MODEL,
};
use crate::services::fields::{get_field_configuration, FieldConfiguration};
use crate::services::prompts;

pub const TEXT_MAX_TOKENS: u32 = 4000;
pub const VISUAL_MAX_TOKENS: u32 = 6000;
pub const PDF_MAX_TOKENS: u32 = 8000;

/// Forma do prompt usado numa tentativa de pitch deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckVariant {
    PdfOptimized,
    Visual,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckAttempt {
    pub variant: DeckVariant,
    pub model: &'static str,
    pub max_tokens: u32,
}

impl DeckAttempt {
    fn text(preference: Option<ModelPreference>) -> Self {
        Self {
            variant: DeckVariant::Text,
            model: select_model(preference, Complexity::Complex),
            max_tokens: TEXT_MAX_TOKENS,
        }
    }
}

/// Modelos tentados numa proposta: o escolhido e, se não for o leve, o leve.
pub fn proposal_attempts(preference: Option<ModelPreference>) -> Vec<&'static str> {
    let first = select_model(preference, Complexity::Complex);
    let mut models = vec![first];
    if first != LIGHTWEIGHT_MODEL {
        models.push(LIGHTWEIGHT_MODEL);
    }
    models
}

/// Sequência de tentativas de um pitch deck, da variante mais rica à mais simples.
pub fn pitch_deck_attempts(request: &PitchDeckRequest) -> Vec<DeckAttempt> {
    let pdf = DeckAttempt {
        variant: DeckVariant::PdfOptimized,
        model: VISUAL_MODEL,
        max_tokens: PDF_MAX_TOKENS,
    };
    let visual = DeckAttempt {
        variant: DeckVariant::Visual,
        model: VISUAL_MODEL,
        max_tokens: VISUAL_MAX_TOKENS,
    };
    let text_chain = [
        DeckAttempt::text(Some(ModelPreference::Primary)),
        DeckAttempt::text(Some(ModelPreference::Lightweight)),
    ];

    let wants_visual =
        request.visual_mode || request.model_preference == Some(ModelPreference::Visual);

    if request.export_format == Some(ExportFormat::Pdf) {
        let mut attempts = vec![pdf, visual];
        attempts.extend(text_chain);
        attempts
    } else if wants_visual {
        let mut attempts = vec![visual];
        attempts.extend(text_chain);
        attempts
    } else {
        let first = DeckAttempt::text(request.model_preference);
        let mut attempts = vec![first];
        if first.model != LIGHTWEIGHT_MODEL {
            attempts.push(DeckAttempt::text(Some(ModelPreference::Lightweight)));
        }
        attempts
    }
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_configured()
    }

    fn field(field_id: &str) -> Result<&'static FieldConfiguration, AppError> {
        get_field_configuration(field_id).ok_or_else(|| AppError::UnknownField(field_id.to_string()))
    }

    pub async fn generate_proposal(&self, request: &ProposalRequest) -> Result<GenerationOutcome, AppError> {
        let field = Self::field(&request.field)?;
        let prompt = prompts::proposal_prompt(request, field);

        let attempts = proposal_attempts(request.model_preference)
            .into_iter()
            .map(|model| (model, prompt.clone(), TEXT_MAX_TOKENS))
            .collect();

        Ok(self.run_attempts("proposal", attempts).await)
    }

    pub async fn generate_pitch_deck(&self, request: &PitchDeckRequest) -> Result<GenerationOutcome, AppError> {
        let field = Self::field(&request.field)?;

        let attempts = pitch_deck_attempts(request)
            .into_iter()
            .map(|attempt| {
                let prompt = match attempt.variant {
                    DeckVariant::PdfOptimized => prompts::pdf_optimized_pitch_deck_prompt(request, field),
                    DeckVariant::Visual => prompts::visual_pitch_deck_prompt(request, field),
                    DeckVariant::Text => prompts::pitch_deck_prompt(request, field),
                };
                (attempt.model, prompt, attempt.max_tokens)
            })
            .collect();

        Ok(self.run_attempts("pitch deck", attempts).await)
    }

    // Percorre as tentativas em ordem; o tempo medido é o da última tentativa.
    async fn run_attempts(
        &self,
        what: &'static str,
        attempts: Vec<(&'static str, String, u32)>,
    ) -> GenerationOutcome {
        let total = attempts.len();
        let mut last_model = "";
        let mut last_error = String::from("No generation attempts");
        let mut last_elapsed = 0;

        for (index, (model, prompt, max_tokens)) in attempts.into_iter().enumerate() {
            let started = Instant::now();
            let result = self
                .generator
                .generate(CompletionRequest {
                    model: model.to_string(),
                    prompt,
                    max_tokens,
                    temperature: DEFAULT_TEMPERATURE,
                })
                .await;
            let elapsed = started.elapsed().as_millis() as u64;

            match result {
                Ok(completion) => {
                    tracing::info!(model, tokens = completion.total_tokens, elapsed_ms = elapsed, "✅ {what} gerado");
                    return GenerationOutcome {
                        success: true,
                        content: completion.text,
                        model: model.to_string(),
                        tokens_used: completion.total_tokens,
                        generation_time: elapsed,
                        error: None,
                    };
                }
                Err(err) => {
                    tracing::warn!(
                        model,
                        attempt = index + 1,
                        of = total,
                        error = %err,
                        "Falha ao gerar {what}, tentando o próximo modelo"
                    );
                    last_model = model;
                    last_error = err.to_string();
                    last_elapsed = elapsed;
                }
            }
        }

        GenerationOutcome {
            success: false,
            content: String::new(),
            model: last_model.to_string(),
            tokens_used: 0,
            generation_time: last_elapsed,
            error: Some(last_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::FieldSpecificData;
    use crate::services::ai_client::{AiError, Completion, FALLBACK_MODEL, PRIMARY_MODEL};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Devolve respostas roteirizadas e registra os pedidos recebidos.
    struct Scripted {
        replies: Mutex<VecDeque<Result<Completion, AiError>>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<Completion, AiError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<CompletionRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate(&self, request: CompletionRequest) -> Result<Completion, AiError> {
            self.seen.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AiError::NotConfigured))
        }
    }

    fn ok(text: &str, tokens: u32) -> Result<Completion, AiError> {
        Ok(Completion { text: text.into(), total_tokens: tokens })
    }

    fn fail(status: u16) -> Result<Completion, AiError> {
        Err(AiError::Api { status, message: "upstream down".into() })
    }

    fn proposal(preference: Option<ModelPreference>) -> ProposalRequest {
        ProposalRequest {
            field: "technology".into(),
            client_name: "Jane".into(),
            client_company: Some("Acme".into()),
            project_title: "Portal".into(),
            project_description: "Customer portal".into(),
            goals: "Self service".into(),
            budget: "$20k".into(),
            timeline: "2 months".into(),
            services: vec!["Web".into()],
            field_specific_data: FieldSpecificData::new(),
            model_preference: preference,
        }
    }

    fn deck() -> PitchDeckRequest {
        PitchDeckRequest {
            field: "technology".into(),
            startup_name: "Acme".into(),
            tagline: Some("Robots for all".into()),
            problem: "Manual work".into(),
            solution: "Robots".into(),
            market: "$5B".into(),
            business_model: None,
            team: None,
            funding: None,
            field_specific_data: FieldSpecificData::new(),
            model_preference: None,
            visual_mode: false,
            export_format: None,
        }
    }

    #[test]
    fn proposal_plan_has_at_most_two_attempts() {
        assert_eq!(proposal_attempts(None), vec![PRIMARY_MODEL, LIGHTWEIGHT_MODEL]);
        assert_eq!(
            proposal_attempts(Some(ModelPreference::Fallback)),
            vec![FALLBACK_MODEL, LIGHTWEIGHT_MODEL]
        );
        assert_eq!(proposal_attempts(Some(ModelPreference::Lightweight)), vec![LIGHTWEIGHT_MODEL]);
    }

    #[test]
    fn pdf_export_plan_walks_every_variant() {
        let mut request = deck();
        request.export_format = Some(ExportFormat::Pdf);

        let plan: Vec<_> = pitch_deck_attempts(&request)
            .into_iter()
            .map(|a| (a.variant, a.model, a.max_tokens))
            .collect();

        assert_eq!(
            plan,
            vec![
                (DeckVariant::PdfOptimized, VISUAL_MODEL, 8000),
                (DeckVariant::Visual, VISUAL_MODEL, 6000),
                (DeckVariant::Text, PRIMARY_MODEL, 4000),
                (DeckVariant::Text, LIGHTWEIGHT_MODEL, 4000),
            ]
        );
    }

    #[test]
    fn visual_mode_starts_at_visual_variant() {
        let mut request = deck();
        request.visual_mode = true;
        let plan = pitch_deck_attempts(&request);
        assert_eq!(plan[0].variant, DeckVariant::Visual);
        assert_eq!(plan.len(), 3);

        let mut request = deck();
        request.model_preference = Some(ModelPreference::Lightweight);
        let plan = pitch_deck_attempts(&request);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].model, LIGHTWEIGHT_MODEL);
    }

    #[tokio::test]
    async fn proposal_succeeds_on_first_model() {
        let generator = Scripted::new(vec![ok("# Proposal", 1200)]);
        let service = GenerationService::new(generator.clone());

        let outcome = service.generate_proposal(&proposal(None)).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.content, "# Proposal");
        assert_eq!(outcome.model, PRIMARY_MODEL);
        assert_eq!(outcome.tokens_used, 1200);

        let seen = generator.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 4000);
        assert!((seen[0].temperature - 0.7).abs() < f32::EPSILON);
        assert!(seen[0].prompt.contains("Client Name: Jane"));
    }

    #[tokio::test]
    async fn proposal_falls_back_to_lightweight_once() {
        let generator = Scripted::new(vec![fail(502), ok("fallback text", 10)]);
        let service = GenerationService::new(generator.clone());

        let outcome = service.generate_proposal(&proposal(None)).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.model, LIGHTWEIGHT_MODEL);
        assert_eq!(generator.seen().len(), 2);
    }

    #[tokio::test]
    async fn proposal_failure_resolves_with_error_outcome() {
        let generator = Scripted::new(vec![fail(500), fail(503)]);
        let service = GenerationService::new(generator.clone());

        let outcome = service.generate_proposal(&proposal(None)).await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.content.is_empty());
        assert_eq!(outcome.tokens_used, 0);
        assert_eq!(outcome.model, LIGHTWEIGHT_MODEL);
        assert!(outcome.error.unwrap().contains("503"));
        assert_eq!(generator.seen().len(), 2);
    }

    #[tokio::test]
    async fn unknown_field_is_rejected_before_calling_the_model() {
        let generator = Scripted::new(vec![]);
        let service = GenerationService::new(generator.clone());
        let mut request = proposal(None);
        request.field = "astrology".into();

        let err = service.generate_proposal(&request).await.unwrap_err();

        assert!(matches!(err, AppError::UnknownField(ref f) if f == "astrology"));
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn pdf_deck_degrades_until_text_succeeds() {
        let generator = Scripted::new(vec![fail(500), fail(500), ok("## Slide 1", 800)]);
        let service = GenerationService::new(generator.clone());
        let mut request = deck();
        request.export_format = Some(ExportFormat::Pdf);

        let outcome = service.generate_pitch_deck(&request).await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.model, PRIMARY_MODEL);

        let seen = generator.seen();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].prompt.contains("<div class=\"slide\""));
        assert!(seen[1].prompt.contains("visual pitch deck"));
        assert!(seen[2].prompt.contains("Make it investor-focused"));
    }
}
