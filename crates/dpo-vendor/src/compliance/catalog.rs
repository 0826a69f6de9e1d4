use serde::Serialize;

use crate::wizard::{FieldKind, FieldListView, FieldSpec, SectionDescriptor, SectionId};

const YES_NO_PARTIAL: [&str; 3] = ["yes", "no", "partially"];

/// Catalog metadata without the views, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub number: usize,
    pub id: SectionId,
    pub title: String,
    pub description: String,
}

pub fn section_summaries(sections: &[SectionDescriptor]) -> Vec<SectionSummary> {
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| SectionSummary {
            number: index + 1,
            id: section.id.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
        })
        .collect()
}

/// The thirteen data-protection attestation sections, in wizard order.
pub fn compliance_sections() -> Vec<SectionDescriptor> {
    vec![
        SectionDescriptor::new(
            "email_collection",
            "Email Collection",
            "This form is collecting emails for vendor compliance tracking.",
            FieldListView::new(vec![FieldSpec::new(
                "email",
                "Contact email",
                FieldKind::Email,
            )]),
        ),
        SectionDescriptor::new(
            "basic_info",
            "Basic Information",
            "Vendor/Third Party Name, Service/Product, and Date",
            FieldListView::new(vec![
                FieldSpec::text("vendor_name", "Vendor / third party name"),
                FieldSpec::text("service_name", "Service or product provided"),
                FieldSpec::new("assessment_date", "Date", FieldKind::Date),
            ]),
        ),
        SectionDescriptor::new(
            "vendor_info",
            "Vendor Information",
            "Detailed vendor information including contact details and data processing scope.",
            FieldListView::new(vec![
                FieldSpec::text("contact_name", "Primary contact"),
                FieldSpec::new("contact_email", "Contact email", FieldKind::Email),
                FieldSpec::text("contact_phone", "Contact phone"),
                FieldSpec::text("registered_address", "Registered address"),
                FieldSpec::new("processing_scope", "Data processing scope", FieldKind::LongText),
                FieldSpec::choice(
                    "data_role",
                    "Role under the contract",
                    &["processor", "sub_processor", "joint_controller"],
                ),
            ]),
        ),
        SectionDescriptor::new(
            "compliance_intro",
            "Vendor Compliance Checklist",
            "Introduction to the compliance assessment checklist.",
            FieldListView::new(vec![FieldSpec::yes_no(
                "acknowledged",
                "I have read the checklist instructions",
            )]),
        ),
        SectionDescriptor::new(
            "legal_contractual",
            "Legal & Contractual Requirements",
            "Assessment of legal agreements and contractual obligations.",
            FieldListView::new(vec![
                FieldSpec::yes_no("dpa_signed", "Data processing agreement signed"),
                FieldSpec::yes_no("confidentiality_clauses", "Confidentiality clauses in place"),
                FieldSpec::yes_no("sub_processor_approval", "Sub-processors require approval"),
                FieldSpec::new("legal_notes", "Notes", FieldKind::LongText),
            ]),
        ),
        SectionDescriptor::new(
            "governance_accountability",
            "Governance & Accountability",
            "Data protection governance structures and accountability measures.",
            FieldListView::new(vec![
                FieldSpec::yes_no("dpo_appointed", "Data protection officer appointed"),
                FieldSpec::choice("privacy_policy", "Documented privacy policy", &YES_NO_PARTIAL),
                FieldSpec::yes_no("staff_training", "Annual staff privacy training"),
                FieldSpec::yes_no("records_of_processing", "Records of processing maintained"),
            ]),
        ),
        SectionDescriptor::new(
            "security_measures",
            "Security Measures",
            "Technical and organizational security measures implemented.",
            FieldListView::new(vec![
                FieldSpec::yes_no("encryption_at_rest", "Encryption at rest"),
                FieldSpec::yes_no("encryption_in_transit", "Encryption in transit"),
                FieldSpec::choice("access_controls", "Role-based access controls", &YES_NO_PARTIAL),
                FieldSpec::yes_no("penetration_testing", "Regular penetration testing"),
                FieldSpec::text("certifications", "Security certifications"),
            ]),
        ),
        SectionDescriptor::new(
            "data_subject_rights",
            "Data Subject Rights",
            "Support for data subject access, correction, erasure and other rights.",
            FieldListView::new(vec![
                FieldSpec::yes_no("access_requests", "Supports access requests"),
                FieldSpec::yes_no("rectification", "Supports rectification"),
                FieldSpec::yes_no("erasure", "Supports erasure"),
                FieldSpec::text("response_time", "Typical response time"),
            ]),
        ),
        SectionDescriptor::new(
            "data_processing",
            "Data Processing",
            "Data processing and management procedures.",
            FieldListView::new(vec![
                FieldSpec::new("data_categories", "Personal data categories", FieldKind::LongText),
                FieldSpec::text("retention_period", "Retention period"),
                FieldSpec::yes_no("data_minimisation", "Data minimisation applied"),
                FieldSpec::text("lawful_basis", "Lawful basis for processing"),
            ]),
        ),
        SectionDescriptor::new(
            "DBM",
            "Data Breach",
            "Incident response plans and breach notification procedures.",
            FieldListView::new(vec![
                FieldSpec::yes_no("incident_plan", "Documented incident response plan"),
                FieldSpec::text("notification_window", "Breach notification window"),
                FieldSpec::yes_no("breach_history", "Breaches in the last 24 months"),
            ]),
        ),
        SectionDescriptor::new(
            "cross_border_transfer",
            "Cross-Border Data Transfer",
            "International data transfer safeguards and compliance measures.",
            FieldListView::new(vec![
                FieldSpec::yes_no("transfers_abroad", "Data transferred across borders"),
                FieldSpec::text("destination_countries", "Destination countries"),
                FieldSpec::choice(
                    "transfer_safeguard",
                    "Transfer safeguard",
                    &["adequacy_decision", "standard_clauses", "binding_rules", "none"],
                ),
            ]),
        ),
        SectionDescriptor::new(
            "monitoring_oversight",
            "Monitoring & Oversight",
            "Ongoing monitoring and audit provisions for vendor oversight.",
            FieldListView::new(vec![
                FieldSpec::yes_no("audit_rights", "Client audit rights granted"),
                FieldSpec::text("audit_frequency", "Audit frequency"),
                FieldSpec::yes_no("compliance_reporting", "Periodic compliance reporting"),
            ]),
        ),
        SectionDescriptor::new(
            "exit_termination",
            "Exit & Termination",
            "Data return, deletion and transition procedures upon contract termination.",
            FieldListView::new(vec![
                FieldSpec::yes_no("data_return", "Data returned on termination"),
                FieldSpec::yes_no("deletion_certificate", "Deletion certified in writing"),
                FieldSpec::text("transition_period", "Transition assistance period"),
            ]),
        ),
    ]
}
