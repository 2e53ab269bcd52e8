// src/services/export/html.rs
//
// HTML para impressão: propostas em A4 retrato, pitch decks em A4 paisagem.

use std::fmt::Write;

use super::markdown::{parse, Block};

const PROPOSAL_CSS: &str = r#"
@page { size: A4; margin: 20mm; }
body { font-family: 'Arial', sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 40px 20px; }
h1 { color: #15803d; font-size: 28px; margin-bottom: 20px; border-bottom: 3px solid #15803d; padding-bottom: 10px; }
h2 { color: #15803d; font-size: 22px; margin-top: 30px; margin-bottom: 15px; }
h3 { color: #374151; font-size: 18px; margin-top: 20px; margin-bottom: 10px; }
p { margin-bottom: 15px; }
li { margin-bottom: 5px; }
hr { border: none; border-top: 1px solid #e5e7eb; margin: 30px 0; }
"#;

const DECK_CSS: &str = r#"
@page { size: A4 landscape; margin: 10mm; }
body { font-family: 'Segoe UI', Arial, sans-serif; color: #1A1A1A; margin: 0; padding: 0; }
.slide { width: 1000px; min-height: 562px; padding: 40px; box-sizing: border-box; position: relative; page-break-after: always; }
.slide:last-child { page-break-after: avoid; }
h1 { font-size: 36px; font-weight: 700; color: #0B2B5B; margin: 0 0 16px; }
h2 { font-size: 28px; font-weight: 600; color: #0B2B5B; margin: 0 0 12px; }
h3 { font-size: 22px; font-weight: 600; color: #0B2B5B; margin: 0 0 8px; }
p, li { font-size: 18px; line-height: 26px; margin: 0 0 6px; }
.title-slide { text-align: center; background: linear-gradient(135deg, #15803d 0%, #84cc16 100%); color: white; }
.title-slide h1 { color: white; font-size: 64px; margin-bottom: 20px; }
.title-slide .tagline { font-size: 32px; margin-bottom: 60px; opacity: 0.9; }
.slide-number { position: absolute; bottom: 30px; right: 30px; font-size: 18px; color: #84cc16; font-weight: bold; }
@media print { .slide { margin: 0; border-radius: 0; } }
"#;

/// Marcador de conteúdo que já chega do modelo como slides HTML.
pub const SLIDE_MARKUP: &str = r#"<div class="slide""#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, css: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        css,
        body
    )
}

/// Corpo da proposta: um elemento por linha, na ordem do conteúdo.
pub fn proposal_body(content: &str) -> String {
    let mut out = String::new();
    for block in parse(content) {
        match block {
            Block::Heading(level, text) => {
                let _ = write!(out, "<h{level}>{}</h{level}>", escape(&text));
            }
            Block::Bold(text) => {
                let _ = write!(out, "<p><strong>{}</strong></p>", escape(&text));
            }
            Block::Bullet(text) => {
                let _ = write!(out, "<li>{}</li>", escape(&text));
            }
            Block::Rule => out.push_str("<hr>"),
            Block::Blank => out.push_str("<br>"),
            Block::Paragraph(text) => {
                let _ = write!(out, "<p>{}</p>", escape(&text));
            }
        }
    }
    out
}

pub fn proposal_html(title: &str, content: &str) -> String {
    page(title, PROPOSAL_CSS, &proposal_body(content))
}

fn title_slide(startup_name: &str, tagline: Option<&str>) -> String {
    format!(
        "<div class=\"slide title-slide\"><h1>{}</h1><div class=\"tagline\">{}</div><div class=\"slide-number\">1</div>",
        escape(startup_name),
        escape(tagline.unwrap_or(""))
    )
}

// Um slide em construção; a lista aberta é fechada na linha em branco
struct SlideBuf {
    html: String,
    list_open: bool,
}

impl SlideBuf {
    fn close_list(&mut self) {
        if self.list_open {
            self.html.push_str("</ul>");
            self.list_open = false;
        }
    }

    fn finish(mut self) -> String {
        self.close_list();
        self.html.push_str("</div>");
        self.html
    }
}

/// Slides do deck. Conteúdo já em HTML passa direto depois do slide de título.
pub fn pitch_deck_body(content: &str, startup_name: &str, tagline: Option<&str>) -> String {
    if content.contains(SLIDE_MARKUP) {
        let mut out = title_slide(startup_name, tagline);
        out.push_str("</div>");
        out.push_str(content);
        return out;
    }

    let mut slides: Vec<String> = Vec::new();
    let mut current: Option<SlideBuf> = None;

    for block in parse(content) {
        // `## Slide N` abre um slide novo; o primeiro vira o slide de título
        if let Block::Heading(2, ref text) = block {
            if text.starts_with("Slide") {
                if let Some(slide) = current.take() {
                    slides.push(slide.finish());
                }
                let number = slides.len() + 1;
                let html = if number == 1 {
                    title_slide(startup_name, tagline)
                } else {
                    format!("<div class=\"slide\"><div class=\"slide-number\">{number}</div>")
                };
                current = Some(SlideBuf { html, list_open: false });
                continue;
            }
        }

        let slide = current.get_or_insert_with(|| SlideBuf {
            html: title_slide(startup_name, tagline),
            list_open: false,
        });

        match block {
            Block::Bold(text) => {
                slide.close_list();
                let _ = write!(slide.html, "<h2>{}</h2>", escape(&text));
            }
            Block::Heading(level, text) => {
                slide.close_list();
                let _ = write!(slide.html, "<h{level}>{}</h{level}>", escape(&text));
            }
            Block::Bullet(text) => {
                if !slide.list_open {
                    slide.html.push_str("<ul>");
                    slide.list_open = true;
                }
                let _ = write!(slide.html, "<li>{}</li>", escape(&text));
            }
            Block::Blank => slide.close_list(),
            Block::Rule => {}
            Block::Paragraph(text) => {
                slide.close_list();
                let _ = write!(slide.html, "<p>{}</p>", escape(&text));
            }
        }
    }

    if let Some(slide) = current {
        slides.push(slide.finish());
    }
    if slides.is_empty() {
        let mut only = title_slide(startup_name, tagline);
        only.push_str("</div>");
        slides.push(only);
    }

    slides.concat()
}

pub fn pitch_deck_html(content: &str, startup_name: &str, tagline: Option<&str>) -> String {
    page(
        &format!("{startup_name} Pitch Deck"),
        DECK_CSS,
        &pitch_deck_body(content, startup_name, tagline),
    )
}
