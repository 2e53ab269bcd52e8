// src/services/export/markdown.rs
//
// Classificação linha a linha do conteúdo gerado. Não há AST: cada linha
// vira exatamente um bloco, sem contexto das linhas vizinhas.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Nível 1 a 3.
    Heading(u8, String),
    Bold(String),
    Bullet(String),
    Rule,
    Blank,
    Paragraph(String),
}

pub fn classify(line: &str) -> Block {
    if let Some(text) = line.strip_prefix("# ") {
        Block::Heading(1, text.to_string())
    } else if let Some(text) = line.strip_prefix("## ") {
        Block::Heading(2, text.to_string())
    } else if let Some(text) = line.strip_prefix("### ") {
        Block::Heading(3, text.to_string())
    } else if line.starts_with("**") && line.ends_with("**") {
        Block::Bold(line.replace("**", ""))
    } else if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
        Block::Bullet(text.to_string())
    } else if line.starts_with("---") {
        Block::Rule
    } else if line.trim().is_empty() {
        Block::Blank
    } else {
        Block::Paragraph(line.to_string())
    }
}

pub fn parse(content: &str) -> Vec<Block> {
    content.lines().map(classify).collect()
}

/// Texto visível de um bloco (usado por renderizadores sem formatação rica).
pub fn plain_text(block: &Block) -> Option<&str> {
    match block {
        Block::Heading(_, text) | Block::Bold(text) | Block::Bullet(text) | Block::Paragraph(text) => {
            Some(text)
        }
        Block::Rule | Block::Blank => None,
    }
}

/// Remove tags HTML e decodifica as entidades mais comuns.
/// Usado para levar decks em HTML ao renderizador nativo.
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut tag = String::new();

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                // Tags de bloco viram quebra de linha
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                if matches!(
                    name.as_str(),
                    "div" | "p" | "br" | "li" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "tr"
                ) {
                    out.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    // Colapsa linhas vazias e espaços de indentação
    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
