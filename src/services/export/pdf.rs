// src/services/export/pdf.rs
//
// Dois motores de PDF atrás do mesmo trait:
// - `chromium`: imprime o HTML com um navegador headless (um processo por requisição)
// - `native`: monta o layout com genpdf a partir dos blocos classificados

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use genpdf::{elements, style, Element};
use tokio::process::Command;
use uuid::Uuid;

use super::markdown::Block;
use super::ExportError;

const BROWSER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Tudo o que um motor pode precisar; cada um usa a sua parte.
#[derive(Debug, Clone)]
pub struct PdfJob {
    pub title: String,
    pub orientation: Orientation,
    pub html: String,
    pub blocks: Vec<Block>,
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    fn engine(&self) -> &'static str;
    async fn render(&self, job: PdfJob) -> Result<Vec<u8>, ExportError>;
}

// --- Chromium headless ---

#[derive(Debug, Clone)]
pub struct ChromiumPdf {
    binary: String,
}

impl ChromiumPdf {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

#[async_trait]
impl PdfRenderer for ChromiumPdf {
    fn engine(&self) -> &'static str {
        "chromium"
    }

    async fn render(&self, job: PdfJob) -> Result<Vec<u8>, ExportError> {
        // A orientação vem do `@page` do próprio HTML
        let workdir = std::env::temp_dir().join(format!("pitchgenie-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&workdir).await?;

        let input = workdir.join("document.html");
        let output = workdir.join("document.pdf");
        tokio::fs::write(&input, job.html.as_bytes()).await?;

        let result = print_to_pdf(&self.binary, &input, &output).await;
        let bytes = match result {
            Ok(()) => tokio::fs::read(&output).await.map_err(ExportError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = tokio::fs::remove_dir_all(&workdir).await {
            tracing::warn!(dir = %workdir.display(), error = %e, "Falha ao limpar diretório temporário");
        }
        bytes
    }
}

async fn print_to_pdf(binary: &str, input: &Path, output: &Path) -> Result<(), ExportError> {
    let child = Command::new(binary)
        .arg("--headless")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--no-pdf-header-footer")
        .arg(format!("--print-to-pdf={}", output.display()))
        .arg(format!("file://{}", input.display()))
        .kill_on_drop(true)
        .output();

    let out = tokio::time::timeout(BROWSER_TIMEOUT, child)
        .await
        .map_err(|_| ExportError::Timeout)??;

    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(ExportError::Browser(format!("{}: {}", out.status, stderr.trim())));
    }
    Ok(())
}

// --- genpdf ---

#[derive(Debug, Clone)]
pub struct NativePdf {
    fonts_dir: PathBuf,
    family: String,
}

impl NativePdf {
    pub fn new(fonts_dir: impl Into<PathBuf>, family: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            family: family.into(),
        }
    }

    fn render_blocking(&self, job: PdfJob) -> Result<Vec<u8>, ExportError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.family, None).map_err(|e| {
            ExportError::Font(format!("{} ({}): {}", self.family, self.fonts_dir.display(), e))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(job.title.clone());
        if job.orientation == Orientation::Landscape {
            doc.set_paper_size(genpdf::Size::new(297, 210));
        }
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(if job.orientation == Orientation::Landscape { 10 } else { 20 });
        doc.set_page_decorator(decorator);

        doc.push(elements::Paragraph::new(job.title).styled(style::Style::new().bold().with_font_size(22)));
        doc.push(elements::Break::new(1));

        for block in job.blocks {
            match block {
                Block::Heading(level, text) => {
                    let size = match level {
                        1 => 18,
                        2 => 15,
                        _ => 13,
                    };
                    doc.push(elements::Break::new(0.5));
                    doc.push(elements::Paragraph::new(text).styled(style::Style::new().bold().with_font_size(size)));
                }
                Block::Bold(text) => {
                    doc.push(elements::Paragraph::new(text).styled(style::Style::new().bold()));
                }
                Block::Bullet(text) => {
                    doc.push(elements::Paragraph::new(format!("  • {text}")));
                }
                Block::Rule => doc.push(elements::Break::new(1)),
                Block::Blank => doc.push(elements::Break::new(0.5)),
                Block::Paragraph(text) => doc.push(elements::Paragraph::new(text)),
            }
        }

        // Renderiza para buffer em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(buffer)
    }
}

#[async_trait]
impl PdfRenderer for NativePdf {
    fn engine(&self) -> &'static str {
        "native"
    }

    async fn render(&self, job: PdfJob) -> Result<Vec<u8>, ExportError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render_blocking(job))
            .await
            .map_err(|e| ExportError::Render(format!("Falha na task de renderização: {e}")))?
    }
}
