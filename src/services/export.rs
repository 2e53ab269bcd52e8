// src/services/export.rs
//
// Exportação dos documentos salvos para arquivos baixáveis.

pub mod docx;
pub mod html;
pub mod markdown;
pub mod pdf;

use std::sync::Arc;

use crate::common::error::AppError;
use crate::models::document::Document;

use self::markdown::{parse, strip_html};
use self::pdf::{Orientation, PdfJob, PdfRenderer};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DOCX packaging failed: {0}")]
    Docx(String),
    #[error("Font loading failed: {0}")]
    Font(String),
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error("Browser failed: {0}")]
    Browser(String),
    #[error("PDF rendering timed out")]
    Timeout,
}

/// Formatos aceitos na exportação de propostas (`?format=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalFormat {
    Pdf,
    Docx,
}

impl ProposalFormat {
    /// Sem `format` (ou vazio) o padrão é PDF; qualquer outro valor é 400.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None | Some("") | Some("pdf") => Ok(ProposalFormat::Pdf),
            Some("docx") => Ok(ProposalFormat::Docx),
            Some(_) => Err(AppError::InvalidExportFormat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ExportedFile {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Troca todo caractere fora de `[A-Za-z0-9]` por `_`.
pub fn safe_filename(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Clone)]
pub struct ExportService {
    pdf: Arc<dyn PdfRenderer>,
}

impl ExportService {
    pub fn new(pdf: Arc<dyn PdfRenderer>) -> Self {
        Self { pdf }
    }

    pub fn pdf_engine(&self) -> &'static str {
        self.pdf.engine()
    }

    pub async fn export_proposal(&self, doc: &Document, format: ProposalFormat) -> Result<ExportedFile, AppError> {
        let title = if doc.project_title.is_empty() { "proposal" } else { doc.project_title.as_str() };
        let base = safe_filename(title);

        let file = match format {
            ProposalFormat::Pdf => {
                let job = PdfJob {
                    title: title.to_string(),
                    orientation: Orientation::Portrait,
                    html: html::proposal_html(title, &doc.content),
                    blocks: parse(&doc.content),
                };
                ExportedFile {
                    bytes: self.pdf.render(job).await?,
                    content_type: PDF_CONTENT_TYPE,
                    filename: format!("{base}.pdf"),
                }
            }
            ProposalFormat::Docx => ExportedFile {
                bytes: docx::render_docx(&doc.content)?,
                content_type: DOCX_CONTENT_TYPE,
                filename: format!("{base}.docx"),
            },
        };

        tracing::info!(document_id = %doc.id, file = %file.filename, size = file.bytes.len(), "📄 Proposta exportada");
        Ok(file)
    }

    pub async fn export_pitch_deck(&self, doc: &Document) -> Result<ExportedFile, AppError> {
        // No deck, client_name guarda o nome da startup e project_title a tagline
        let startup_name = doc.client_name.as_str();
        let tagline = Some(doc.project_title.as_str()).filter(|t| !t.is_empty() && *t != startup_name);

        let blocks = if doc.content.contains(html::SLIDE_MARKUP) {
            parse(&strip_html(&doc.content))
        } else {
            parse(&doc.content)
        };

        let job = PdfJob {
            title: format!("{startup_name} Pitch Deck"),
            orientation: Orientation::Landscape,
            html: html::pitch_deck_html(&doc.content, startup_name, tagline),
            blocks,
        };

        let file = ExportedFile {
            bytes: self.pdf.render(job).await?,
            content_type: PDF_CONTENT_TYPE,
            filename: format!("{}_pitch_deck.pdf", safe_filename(startup_name)),
        };

        tracing::info!(document_id = %doc.id, file = %file.filename, size = file.bytes.len(), "📊 Pitch deck exportado");
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::models::document::DocumentKind;

    #[derive(Default)]
    struct Capture {
        jobs: Mutex<Vec<PdfJob>>,
    }

    #[async_trait]
    impl PdfRenderer for Capture {
        fn engine(&self) -> &'static str {
            "capture"
        }

        async fn render(&self, job: PdfJob) -> Result<Vec<u8>, ExportError> {
            self.jobs.lock().unwrap().push(job);
            Ok(b"%PDF-1.4 fake".to_vec())
        }
    }

    fn document(kind: DocumentKind, client: &str, title: &str, content: &str) -> Document {
        Document {
            id: "prop_1_abc".into(),
            user_id: Uuid::new_v4(),
            kind,
            client_name: client.into(),
            client_company: None,
            project_title: title.into(),
            content: content.into(),
            metadata: json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn filenames_replace_every_unsafe_character() {
        assert_eq!(safe_filename("Tech & AI Corp (2025)"), "Tech___AI_Corp__2025_");
        assert_eq!(safe_filename("Café"), "Caf_");
        assert_eq!(safe_filename("plain123"), "plain123");
    }

    #[test]
    fn format_defaults_to_pdf() {
        assert_eq!(ProposalFormat::parse(None).unwrap(), ProposalFormat::Pdf);
        assert_eq!(ProposalFormat::parse(Some("")).unwrap(), ProposalFormat::Pdf);
        assert_eq!(ProposalFormat::parse(Some("docx")).unwrap(), ProposalFormat::Docx);
        assert!(matches!(ProposalFormat::parse(Some("xlsx")), Err(AppError::InvalidExportFormat)));
        assert!(matches!(ProposalFormat::parse(Some("PDF")), Err(AppError::InvalidExportFormat)));
    }

    #[tokio::test]
    async fn proposal_pdf_uses_portrait_job() {
        let capture = Arc::new(Capture::default());
        let service = ExportService::new(capture.clone());
        let doc = document(DocumentKind::Proposal, "Jane", "Web Portal", "# Scope\n- login");

        let file = service.export_proposal(&doc, ProposalFormat::Pdf).await.unwrap();

        assert_eq!(file.filename, "Web_Portal.pdf");
        assert_eq!(file.content_type, PDF_CONTENT_TYPE);
        assert_eq!(file.content_disposition(), "attachment; filename=\"Web_Portal.pdf\"");

        let jobs = capture.jobs.lock().unwrap();
        assert_eq!(jobs[0].orientation, Orientation::Portrait);
        assert!(jobs[0].html.contains("<h1>Scope</h1>"));
        assert_eq!(jobs[0].blocks.len(), 2);
    }

    #[tokio::test]
    async fn proposal_docx_skips_the_pdf_engine() {
        let capture = Arc::new(Capture::default());
        let service = ExportService::new(capture.clone());
        let doc = document(DocumentKind::Proposal, "Jane", "", "Text");

        let file = service.export_proposal(&doc, ProposalFormat::Docx).await.unwrap();

        assert_eq!(file.filename, "proposal.docx");
        assert_eq!(file.content_type, DOCX_CONTENT_TYPE);
        assert!(file.bytes.starts_with(b"PK"));
        assert!(capture.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pitch_deck_is_landscape_and_named_after_startup() {
        let capture = Arc::new(Capture::default());
        let service = ExportService::new(capture.clone());
        let doc = document(
            DocumentKind::PitchDeck,
            "Acme Robotics",
            "Robots for all",
            r#"<div class="slide"><h1>Problem</h1></div>"#,
        );

        let file = service.export_pitch_deck(&doc).await.unwrap();

        assert_eq!(file.filename, "Acme_Robotics_pitch_deck.pdf");
        let jobs = capture.jobs.lock().unwrap();
        assert_eq!(jobs[0].orientation, Orientation::Landscape);
        assert!(jobs[0].html.contains("<div class=\"tagline\">Robots for all</div>"));
        assert_eq!(jobs[0].blocks, vec![markdown::Block::Paragraph("Problem".into())]);
    }
}
