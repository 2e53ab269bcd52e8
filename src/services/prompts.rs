// src/services/prompts.rs
//
// Montagem dos prompts enviados ao modelo. Cada área contribui com seções,
// slides e diretrizes vindas do catálogo em `fields.rs`.

use std::fmt::Write;

use crate::models::generation::{FieldSpecificData, PitchDeckRequest, ProposalRequest};
use crate::services::fields::FieldConfiguration;

const NOT_SPECIFIED: &str = "Not specified";

// Template HTML de um slide para o deck otimizado para PDF
const PDF_SLIDE_TEMPLATE: &str = r#"<div class="slide" style="page-break-after: always; margin: 20px; padding: 30px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border-radius: 10px;">
  <h1 style="font-size: 32px; font-weight: bold; margin-bottom: 20px; text-align: center;">[SLIDE TITLE]</h1>
  <div style="display: flex; gap: 20px; margin-top: 30px;">
    <div style="flex: 1;">
      <h2 style="font-size: 24px; margin-bottom: 15px;">Key Points</h2>
      <ul style="font-size: 18px; line-height: 1.6;">
        <li>[Point 1 with specific data/metrics]</li>
        <li>[Point 2 with specific data/metrics]</li>
        <li>[Point 3 with specific data/metrics]</li>
      </ul>
    </div>
    <div style="flex: 1; background: rgba(255,255,255,0.1); padding: 20px; border-radius: 8px;">
      <h3 style="font-size: 20px; margin-bottom: 10px;">Visual Elements</h3>
      <p style="font-size: 16px; line-height: 1.5;">[Detailed visual description for charts, graphs, images]</p>
    </div>
  </div>
  <div style="margin-top: 30px; padding: 15px; background: rgba(255,255,255,0.1); border-radius: 8px;">
    <h3 style="font-size: 18px; margin-bottom: 10px;">Speaker Notes</h3>
    <p style="font-size: 16px; line-height: 1.5;">[Compelling talking points for presentation]</p>
  </div>
</div>"#;

fn field_data_lines(data: &FieldSpecificData) -> String {
    data.iter()
        .map(|(key, value)| format!("- {key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn slide_list(slides: &[&str]) -> String {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| format!("**Slide {}: {slide}**", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

// Bloco de dados da startup comum aos três prompts de pitch deck
fn startup_block(out: &mut String, data: &PitchDeckRequest) {
    let _ = writeln!(out, "Startup Information:");
    let _ = writeln!(out, "- Company: {}", data.startup_name);
    let _ = writeln!(out, "- Tagline: {}", data.tagline.as_deref().unwrap_or(NOT_SPECIFIED));
    let _ = writeln!(out, "- Problem: {}", data.problem);
    let _ = writeln!(out, "- Solution: {}", data.solution);
    let _ = writeln!(out, "- Market: {}", data.market);
    let _ = writeln!(
        out,
        "- Business Model: {}",
        data.business_model.as_deref().unwrap_or("To be refined")
    );
    let _ = writeln!(out, "- Team: {}", data.team.as_deref().unwrap_or("Strong founding team"));
    let _ = writeln!(
        out,
        "- Funding Ask: {}",
        data.funding.as_deref().unwrap_or("Seeking investment")
    );
    out.push('\n');
}

pub fn proposal_prompt(data: &ProposalRequest, field: &FieldConfiguration) -> String {
    let workflow = &field.workflows.proposal;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are a professional {} consultant creating a comprehensive business proposal.\n",
        field.name.to_lowercase()
    );
    let _ = writeln!(out, "Client Information:");
    let _ = writeln!(out, "- Client Name: {}", data.client_name);
    let _ = writeln!(
        out,
        "- Company: {}",
        data.client_company.as_deref().unwrap_or(NOT_SPECIFIED)
    );
    let _ = writeln!(out, "- Project: {}", data.project_title);
    let _ = writeln!(out, "- Description: {}", data.project_description);
    let _ = writeln!(out, "- Goals: {}", data.goals);
    let _ = writeln!(out, "- Budget: {}", data.budget);
    let _ = writeln!(out, "- Timeline: {}", data.timeline);
    let _ = writeln!(out, "- Services Requested: {}\n", data.services.join(", "));

    let _ = writeln!(out, "Industry Focus: {}", field.name);
    let _ = writeln!(out, "Tone: Professional, {}\n", workflow.tone);

    let _ = writeln!(out, "Field-Specific Data:\n{}\n", field_data_lines(&data.field_specific_data));

    let _ = writeln!(
        out,
        "Generate a comprehensive proposal with these sections:\n{}\n",
        numbered(workflow.sections)
    );

    let guidelines = workflow
        .industry_prompts
        .iter()
        .map(|p| format!("- {p}"))
        .collect::<Vec<_>>()
        .join("\n");
    let _ = writeln!(out, "Industry Guidelines:\n{guidelines}\n");

    let _ = writeln!(
        out,
        "Format as a professional document with clear headings and detailed content for each section."
    );
    let _ = writeln!(out, "Target length: ~{} words.", workflow.suggested_length);
    out
}

pub fn pitch_deck_prompt(data: &PitchDeckRequest, field: &FieldConfiguration) -> String {
    let workflow = &field.workflows.pitch_deck;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are creating a compelling {} pitch deck for investors.\n",
        field.name.to_lowercase()
    );
    startup_block(&mut out, data);

    let _ = writeln!(out, "Industry Focus: {}", field.name);
    let _ = writeln!(out, "Presentation Style: {}\n", workflow.presentation_style);
    let _ = writeln!(out, "Field-Specific Data:\n{}\n", field_data_lines(&data.field_specific_data));

    let _ = writeln!(
        out,
        "Create a {}-slide pitch deck with these slides:\n{}\n",
        workflow.slides.len(),
        slide_list(workflow.slides)
    );
    let _ = writeln!(out, "Focus Areas: {}\n", workflow.focus_areas.join(", "));

    let _ = writeln!(out, "For each slide, provide:");
    let _ = writeln!(out, "1. A compelling headline");
    let _ = writeln!(out, "2. 2-4 key bullet points");
    let _ = writeln!(out, "3. Suggested visuals description");
    let _ = writeln!(out, "4. Speaker notes with talking points\n");

    let _ = writeln!(
        out,
        "Make it investor-focused, data-driven, and {}.",
        workflow.credibility
    );
    out
}

pub fn visual_pitch_deck_prompt(data: &PitchDeckRequest, field: &FieldConfiguration) -> String {
    let workflow = &field.workflows.pitch_deck;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are creating a compelling visual {} pitch deck for investors. \
         This will be exported as a professional PDF document.\n",
        field.name.to_lowercase()
    );
    startup_block(&mut out, data);

    let _ = writeln!(out, "Industry Focus: {}", field.name);
    let _ = writeln!(out, "Presentation Style: Professional, visually engaging, PDF-ready format\n");
    let _ = writeln!(out, "Field-Specific Data:\n{}\n", field_data_lines(&data.field_specific_data));

    let _ = writeln!(
        out,
        "Create a {}-slide visual pitch deck optimized for PDF export with these slides:\n{}\n",
        workflow.slides.len(),
        slide_list(workflow.slides)
    );

    out.push_str(
        "For each slide, provide:
1. **Slide Title**: A compelling, concise headline (max 60 characters)
2. **Key Points**: 2-4 impactful bullet points with specific data/metrics
3. **Visual Layout**: chart specifications, image placement, color scheme, typography hierarchy and layout structure
4. **Visual Elements**: data visualization types, icons, product mockups, team photos or logo placement, process flows
5. **Speaker Notes**: Compelling talking points for presentation
6. **PDF Optimization**: font sizes, spacing, margins and page breaks

Focus on creating content that:
- Translates well to PDF format
- Is visually engaging and investor-focused
- Contains clear, actionable data and metrics
- Maintains professional appearance in print
",
    );
    let _ = writeln!(out, "- {}\n", workflow.visual_value_focus);
    out.push_str("Format the output with clear HTML-like structure for easy PDF conversion.\n");
    out
}

pub fn pdf_optimized_pitch_deck_prompt(data: &PitchDeckRequest, field: &FieldConfiguration) -> String {
    let workflow = &field.workflows.pitch_deck;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "You are creating a premium {} pitch deck specifically optimized for PDF export. \
         This will be a professional, print-ready document.\n",
        field.name.to_lowercase()
    );
    startup_block(&mut out, data);

    let _ = writeln!(out, "Industry Focus: {}", field.name);
    let _ = writeln!(out, "Output Format: HTML-structured content optimized for PDF conversion\n");
    let _ = writeln!(out, "Field-Specific Data:\n{}\n", field_data_lines(&data.field_specific_data));

    let _ = writeln!(
        out,
        "Create a {}-slide pitch deck with this exact HTML structure for each slide:\n\n{PDF_SLIDE_TEMPLATE}\n",
        workflow.slides.len()
    );

    out.push_str(
        "For each slide, provide:
1. **Slide Title**: Compelling headline (max 50 characters)
2. **Key Points**: 3-4 bullet points with specific metrics/data
3. **Visual Elements**: data visualizations, product mockups, team photos or branding, process flows
4. **Speaker Notes**: Engaging talking points for presentation

",
    );
    let _ = writeln!(out, "Slides to create:\n{}\n", slide_list(workflow.slides));

    out.push_str(
        "Focus on creating content that:
- Uses professional, investor-focused language
- Includes specific, measurable data and metrics
- Provides clear visual descriptions for PDF rendering
- Maintains consistent styling and layout
",
    );
    let _ = writeln!(out, "- {}\n", workflow.pdf_value_focus);
    out.push_str("Ensure each slide is self-contained and will render properly in PDF format.\n");
    out
}
