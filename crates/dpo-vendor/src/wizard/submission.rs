use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::section::SectionId;
use super::state::FormState;
use crate::auth::Identity;

const SERVICE_NAME_KEYS: [&str; 2] = ["service_name", "serviceName"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review status of a finalized form. Intake only ever writes `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

/// Row handed to the adapter on final submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSubmission {
    pub vendor_name: String,
    pub vendor_email: String,
    pub service_name: String,
    pub form_data: FormState,
    pub status: SubmissionStatus,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
}

impl ComplianceSubmission {
    /// Assemble the submission row; `section_order` decides which section wins the service name.
    ///
    /// The service name is looked up one level down, inside each section's payload, never at the
    /// top level of the aggregate.
    pub fn from_form(
        identity: &Identity,
        form_data: FormState,
        section_order: &[SectionId],
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let service_name = form_data
            .find_text(&SERVICE_NAME_KEYS, section_order)
            .unwrap_or("Unknown Service")
            .to_string();

        Self {
            vendor_name: identity.vendor_name(),
            vendor_email: identity.email.clone(),
            service_name,
            form_data,
            status: SubmissionStatus::Pending,
            submitted_by: identity.id.clone(),
            submitted_at,
        }
    }
}

/// Partial form saved for later; completeness is never checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSubmission {
    pub form_data: FormState,
    pub current_step: usize,
    pub owner: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: SubmissionId,
    pub status: SubmissionStatus,
}

/// Submission as persisted by the backend, for admin listings and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    #[serde(flatten)]
    pub submission: ComplianceSubmission,
}

/// Persistence seam for drafts and finalized forms.
#[async_trait]
pub trait SubmissionAdapter: Send + Sync {
    async fn save_draft(&self, draft: &DraftSubmission) -> Result<(), SubmissionError>;
    async fn submit_final(
        &self,
        submission: &ComplianceSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError>;
    async fn submissions(&self) -> Result<Vec<StoredSubmission>, SubmissionError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission backend unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::SectionData;
    use serde_json::json;

    fn section(value: serde_json::Value) -> SectionData {
        value.as_object().cloned().expect("object payload")
    }

    fn submitted_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-10-01T09:30:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn from_form_pulls_service_name_and_vendor_details() {
        let identity = Identity {
            company: Some("Acme Processing Ltd".to_string()),
            ..Identity::vendor("user-7", "privacy@acme.test")
        };
        let mut form = FormState::new();
        form.replace(
            SectionId::from("basic_info"),
            section(json!({ "service_name": "Payroll outsourcing" })),
        );

        let submission = ComplianceSubmission::from_form(
            &identity,
            form.clone(),
            &[SectionId::from("basic_info")],
            submitted_at(),
        );

        assert_eq!(submission.vendor_name, "Acme Processing Ltd");
        assert_eq!(submission.vendor_email, "privacy@acme.test");
        assert_eq!(submission.service_name, "Payroll outsourcing");
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.submitted_by, "user-7");
        assert_eq!(submission.form_data, form);
    }

    #[test]
    fn from_form_defaults_unknown_service() {
        let identity = Identity::vendor("user-8", "ops@vendor.test");
        let submission =
            ComplianceSubmission::from_form(&identity, FormState::new(), &[], submitted_at());

        assert_eq!(submission.service_name, "Unknown Service");
        assert_eq!(submission.vendor_name, "Unknown Vendor");
    }
}
