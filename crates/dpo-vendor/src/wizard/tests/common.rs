use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{Identity, IdentityError, IdentityProvider};
use crate::wizard::{
    ComplianceSubmission, DraftSubmission, FieldListView, FieldSpec, FormWizard, SectionData,
    SectionDescriptor, StoredSubmission, SubmissionAdapter, SubmissionError, SubmissionId,
    SubmissionReceipt, SubmissionStatus,
};

#[derive(Default)]
pub(super) struct RecordingAdapter {
    drafts: Mutex<Vec<DraftSubmission>>,
    finals: Mutex<Vec<ComplianceSubmission>>,
    offline: bool,
}

impl RecordingAdapter {
    pub(super) fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub(super) fn drafts(&self) -> Vec<DraftSubmission> {
        self.drafts.lock().expect("drafts mutex").clone()
    }

    pub(super) fn finals(&self) -> Vec<ComplianceSubmission> {
        self.finals.lock().expect("finals mutex").clone()
    }
}

#[async_trait]
impl SubmissionAdapter for RecordingAdapter {
    async fn save_draft(&self, draft: &DraftSubmission) -> Result<(), SubmissionError> {
        if self.offline {
            return Err(SubmissionError::Unavailable("network unreachable".to_string()));
        }
        self.drafts.lock().expect("drafts mutex").push(draft.clone());
        Ok(())
    }

    async fn submit_final(
        &self,
        submission: &ComplianceSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if self.offline {
            return Err(SubmissionError::Unavailable("network unreachable".to_string()));
        }
        let mut finals = self.finals.lock().expect("finals mutex");
        finals.push(submission.clone());
        Ok(SubmissionReceipt {
            submission_id: SubmissionId(format!("sub-{}", finals.len())),
            status: SubmissionStatus::Pending,
        })
    }

    async fn submissions(&self) -> Result<Vec<StoredSubmission>, SubmissionError> {
        Ok(self
            .finals()
            .into_iter()
            .enumerate()
            .map(|(index, submission)| StoredSubmission {
                id: SubmissionId(format!("sub-{}", index + 1)),
                submission,
            })
            .collect())
    }
}

pub(super) struct FixedIdentity(pub(super) Option<Identity>);

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        Ok(self.0.clone())
    }
}

pub(super) struct BrokenIdentity;

#[async_trait]
impl IdentityProvider for BrokenIdentity {
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        Err(IdentityError::Unavailable("session expired".to_string()))
    }
}

pub(super) fn vendor() -> Identity {
    Identity {
        first_name: Some("Ada".to_string()),
        last_name: Some("Okafor".to_string()),
        ..Identity::vendor("vendor-1", "ada@acme.test")
    }
}

pub(super) fn sections(ids: &[&str]) -> Vec<SectionDescriptor> {
    ids.iter()
        .map(|id| {
            SectionDescriptor::new(
                *id,
                format!("Section {id}"),
                format!("Fields for section {id}"),
                FieldListView::new(vec![
                    FieldSpec::text("x", "X"),
                    FieldSpec::text("y", "Y"),
                    FieldSpec::text("service_name", "Service"),
                ]),
            )
        })
        .collect()
}

pub(super) type TestWizard = FormWizard<RecordingAdapter, FixedIdentity>;

pub(super) fn wizard_with(
    ids: &[&str],
    adapter: RecordingAdapter,
    identity: Option<Identity>,
) -> (TestWizard, Arc<RecordingAdapter>) {
    let adapter = Arc::new(adapter);
    let wizard = FormWizard::new(
        sections(ids),
        adapter.clone(),
        Arc::new(FixedIdentity(identity)),
    )
    .expect("valid sections");
    (wizard, adapter)
}

pub(super) fn wizard(ids: &[&str]) -> (TestWizard, Arc<RecordingAdapter>) {
    wizard_with(ids, RecordingAdapter::default(), Some(vendor()))
}

pub(super) fn data(value: Value) -> SectionData {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object payload, got {other}"),
    }
}
