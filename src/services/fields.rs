// src/services/fields.rs
//
// Catálogo estático das áreas de atuação. Cada área define as seções da
// proposta, os slides do pitch deck e os campos extras do formulário.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormFieldType {
    Text,
    Textarea,
    Select,
    Multiselect,
}

fn no_options(options: &&[&str]) -> bool {
    options.is_empty()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[schema(value_type = String)]
    pub id: &'static str,
    #[schema(value_type = String)]
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FormFieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "no_options")]
    #[schema(value_type = Vec<String>)]
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<&'static str>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalWorkflow {
    #[schema(value_type = Vec<String>)]
    pub sections: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub required_fields: &'static [&'static str],
    pub suggested_length: u32,
    #[schema(value_type = Vec<String>)]
    pub industry_prompts: &'static [&'static str],
    /// Complemento do tom "Professional, ..." no prompt.
    #[schema(value_type = String)]
    pub tone: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeckWorkflow {
    #[schema(value_type = Vec<String>)]
    pub slides: &'static [&'static str],
    #[schema(value_type = Vec<String>)]
    pub required_fields: &'static [&'static str],
    #[schema(value_type = String)]
    pub presentation_style: &'static str,
    #[schema(value_type = Vec<String>)]
    pub focus_areas: &'static [&'static str],
    // Frases de credibilidade usadas nos três prompts de pitch deck
    #[schema(value_type = String)]
    pub credibility: &'static str,
    #[schema(value_type = String)]
    pub visual_value_focus: &'static str,
    #[schema(value_type = String)]
    pub pdf_value_focus: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Workflows {
    pub proposal: ProposalWorkflow,
    pub pitch_deck: PitchDeckWorkflow,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfiguration {
    #[schema(value_type = String)]
    pub id: &'static str,
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = String)]
    pub description: &'static str,
    #[schema(value_type = String)]
    pub color: &'static str,
    pub workflows: Workflows,
    #[schema(value_type = Vec<FormField>)]
    pub form_fields: &'static [FormField],
}

pub static FIELD_CONFIGURATIONS: &[FieldConfiguration] = &[
    FieldConfiguration {
        id: "technology",
        name: "Technology & Software Development",
        description: "Software development, SaaS products, technical consulting",
        color: "blue",
        workflows: Workflows {
            proposal: ProposalWorkflow {
                sections: &[
                    "Technical Requirements Analysis",
                    "Solution Architecture",
                    "Development Methodology",
                    "Technology Stack Recommendations",
                    "Timeline & Milestones",
                    "Development Team Structure",
                    "Quality Assurance Process",
                    "Deployment & Maintenance",
                    "Security Considerations",
                    "Budget Breakdown",
                ],
                required_fields: &["projectComplexity", "techStack", "timeline", "budget"],
                suggested_length: 2500,
                industry_prompts: &[
                    "Focus on technical architecture and scalability",
                    "Include security and compliance considerations",
                    "Emphasize development methodology and best practices",
                    "Highlight technical expertise and experience",
                ],
                tone: "technically precise, solution-oriented",
            },
            pitch_deck: PitchDeckWorkflow {
                slides: &[
                    "Problem & Market Gap",
                    "Technical Solution",
                    "Product Demo/MVP",
                    "Technology Competitive Advantage",
                    "Development Roadmap",
                    "Tech Team Expertise",
                    "Scalability Architecture",
                    "Market Validation & Metrics",
                    "Funding for R&D",
                    "Go-to-Market Strategy",
                ],
                required_fields: &["problemStatement", "technicalSolution", "marketSize"],
                presentation_style: "technical",
                focus_areas: &["innovation", "scalability", "technical_expertise", "market_disruption"],
                credibility: "technically credible",
                visual_value_focus: "Demonstrates technical credibility with clear product value",
                pdf_value_focus: "Demonstrates technical innovation and market potential",
            },
        },
        form_fields: &[
            FormField {
                id: "projectComplexity",
                label: "Project Complexity",
                field_type: FormFieldType::Select,
                required: true,
                placeholder: None,
                options: &["Simple", "Medium", "Complex", "Enterprise"],
                description: Some("How complex is the technical implementation?"),
            },
            FormField {
                id: "techStack",
                label: "Preferred Technology Stack",
                field_type: FormFieldType::Multiselect,
                required: false,
                placeholder: None,
                options: &[
                    "React/Next.js",
                    "Node.js",
                    "Python/Django",
                    "Java/Spring",
                    "AWS",
                    "Azure",
                    "Docker",
                    "Kubernetes",
                ],
                description: Some("Select preferred technologies for the project"),
            },
            FormField {
                id: "integrationNeeds",
                label: "Integration Requirements",
                field_type: FormFieldType::Textarea,
                required: false,
                placeholder: Some("Describe any third-party integrations, APIs, or existing systems..."),
                options: &[],
                description: None,
            },
            FormField {
                id: "securityRequirements",
                label: "Security & Compliance Needs",
                field_type: FormFieldType::Multiselect,
                required: false,
                placeholder: None,
                options: &["GDPR", "SOC 2", "HIPAA", "PCI DSS", "ISO 27001", "Custom Security Requirements"],
                description: None,
            },
        ],
    },
    FieldConfiguration {
        id: "healthcare",
        name: "Healthcare & Medical Services",
        description: "Medical devices, healthcare software, clinical services",
        color: "red",
        workflows: Workflows {
            proposal: ProposalWorkflow {
                sections: &[
                    "Healthcare Compliance Overview",
                    "Patient Data Security (HIPAA)",
                    "Clinical Workflow Integration",
                    "Regulatory Requirements",
                    "Training & Implementation",
                    "Outcome Measurement",
                    "Risk Management",
                    "Compliance Monitoring",
                    "Support & Maintenance",
                ],
                required_fields: &["complianceType", "patientPopulation", "regulatoryPath"],
                suggested_length: 3000,
                industry_prompts: &[
                    "Prioritize patient safety and outcomes",
                    "Include relevant regulatory considerations",
                    "Reference clinical evidence and best practices",
                    "Address compliance and risk management",
                ],
                tone: "empathetic, evidence-based, authoritative",
            },
            pitch_deck: PitchDeckWorkflow {
                slides: &[
                    "Healthcare Problem",
                    "Clinical Solution",
                    "Regulatory Pathway",
                    "Clinical Validation",
                    "Healthcare Market Size",
                    "Reimbursement Strategy",
                    "Clinical Advisory Board",
                    "FDA/Regulatory Status",
                    "Healthcare Partnerships",
                    "Patient Impact Metrics",
                ],
                required_fields: &["healthcareProblem", "clinicalSolution", "regulatoryStatus"],
                presentation_style: "clinical",
                focus_areas: &["patient_outcomes", "clinical_evidence", "regulatory_compliance", "market_access"],
                credibility: "clinically validated",
                visual_value_focus: "Shows evidence-based value propositions with measurable impact",
                pdf_value_focus: "Shows evidence-based solutions and measurable impact",
            },
        },
        form_fields: &[
            FormField {
                id: "complianceType",
                label: "Compliance Requirements",
                field_type: FormFieldType::Multiselect,
                required: true,
                placeholder: None,
                options: &["HIPAA", "FDA 510(k)", "FDA PMA", "MDR (EU)", "ISO 13485", "Other"],
                description: Some("Which regulatory standards apply?"),
            },
            FormField {
                id: "patientPopulation",
                label: "Target Patient Population",
                field_type: FormFieldType::Text,
                required: true,
                placeholder: Some("e.g., Diabetes patients, Elderly care, Pediatric oncology..."),
                options: &[],
                description: None,
            },
            FormField {
                id: "clinicalOutcomes",
                label: "Expected Clinical Outcomes",
                field_type: FormFieldType::Textarea,
                required: false,
                placeholder: Some("Describe the clinical benefits and measurable outcomes..."),
                options: &[],
                description: None,
            },
        ],
    },
];

pub fn get_field_configuration(field_id: &str) -> Option<&'static FieldConfiguration> {
    FIELD_CONFIGURATIONS.iter().find(|field| field.id == field_id)
}

pub fn all_fields() -> &'static [FieldConfiguration] {
    FIELD_CONFIGURATIONS
}
