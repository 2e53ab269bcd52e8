// src/services/export/docx.rs
//
// DOCX gerado com docx-rs: estilos de título e uma lista com marcadores.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering, NumberingId,
    PageMargin, Paragraph, Run, SpecialIndentType, Start, Style, StyleType,
};

use super::markdown::{parse, Block};
use super::ExportError;

const BULLETS: usize = 1;
const ACCENT: &str = "15803D";

fn heading_style(level: u8, size: usize, color: &str) -> Style {
    Style::new(format!("Heading{level}"), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .bold()
        .size(size)
        .color(color)
}

fn styled(docx: Docx) -> Docx {
    docx.add_style(heading_style(1, 36, ACCENT))
        .add_style(heading_style(2, 30, ACCENT))
        .add_style(heading_style(3, 26, "374151"))
        .add_abstract_numbering(
            AbstractNumbering::new(BULLETS).add_level(
                Level::new(0, Start::new(1), NumberFormat::new("bullet"), LevelText::new("•"), LevelJc::new("left"))
                    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLETS, BULLETS))
        .page_size(11906, 16838)
        .page_margin(PageMargin::new().top(1134).bottom(1134).left(1134).right(1134))
}

/// Parágrafo Word de um bloco. Linhas em branco e réguas somem.
fn paragraph(block: &Block) -> Option<Paragraph> {
    let paragraph = match block {
        Block::Heading(level, text) => Paragraph::new()
            .style(&format!("Heading{}", (*level).clamp(1, 3)))
            .add_run(Run::new().add_text(text.as_str())),
        Block::Bold(text) => Paragraph::new().add_run(Run::new().add_text(text.as_str()).bold()),
        Block::Bullet(text) => Paragraph::new()
            .numbering(NumberingId::new(BULLETS), IndentLevel::new(0))
            .add_run(Run::new().add_text(text.as_str())),
        Block::Paragraph(text) => Paragraph::new().add_run(Run::new().add_text(text.as_str())),
        Block::Rule | Block::Blank => return None,
    };
    Some(paragraph)
}

pub fn build_docx(content: &str) -> Docx {
    parse(content)
        .iter()
        .filter_map(paragraph)
        .fold(styled(Docx::new()), |docx, p| docx.add_paragraph(p))
}

pub fn render_docx(content: &str) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    build_docx(content)
        .build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}
