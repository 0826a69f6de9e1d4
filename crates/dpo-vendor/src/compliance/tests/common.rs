use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::auth::{Identity, IdentityError, ProfileDirectory, Role};
use crate::compliance::{compliance_router, compliance_sections, ComplianceIntakeService};
use crate::wizard::{
    ComplianceSubmission, DraftSubmission, StoredSubmission, SubmissionAdapter, SubmissionError,
    SubmissionId, SubmissionReceipt, SubmissionStatus,
};

#[derive(Default)]
pub(super) struct MemoryAdapter {
    drafts: Mutex<Vec<DraftSubmission>>,
    stored: Mutex<Vec<StoredSubmission>>,
}

impl MemoryAdapter {
    pub(super) fn drafts(&self) -> Vec<DraftSubmission> {
        self.drafts.lock().expect("drafts mutex").clone()
    }

    pub(super) fn stored(&self) -> Vec<StoredSubmission> {
        self.stored.lock().expect("stored mutex").clone()
    }
}

#[async_trait]
impl SubmissionAdapter for MemoryAdapter {
    async fn save_draft(&self, draft: &DraftSubmission) -> Result<(), SubmissionError> {
        self.drafts.lock().expect("drafts mutex").push(draft.clone());
        Ok(())
    }

    async fn submit_final(
        &self,
        submission: &ComplianceSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let mut stored = self.stored.lock().expect("stored mutex");
        let id = SubmissionId(format!("sub-{:04}", stored.len() + 1));
        stored.push(StoredSubmission {
            id: id.clone(),
            submission: submission.clone(),
        });
        Ok(SubmissionReceipt {
            submission_id: id,
            status: SubmissionStatus::Pending,
        })
    }

    async fn submissions(&self) -> Result<Vec<StoredSubmission>, SubmissionError> {
        Ok(self.stored())
    }
}

/// Adapter whose backend is always down.
pub(super) struct OfflineAdapter;

#[async_trait]
impl SubmissionAdapter for OfflineAdapter {
    async fn save_draft(&self, _draft: &DraftSubmission) -> Result<(), SubmissionError> {
        Err(SubmissionError::Unavailable("connection refused".to_string()))
    }

    async fn submit_final(
        &self,
        _submission: &ComplianceSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Unavailable("connection refused".to_string()))
    }

    async fn submissions(&self) -> Result<Vec<StoredSubmission>, SubmissionError> {
        Err(SubmissionError::Unavailable("connection refused".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profiles: Mutex<HashMap<String, Identity>>,
}

impl MemoryProfiles {
    pub(super) fn seeded() -> Self {
        let profiles = Self::default();
        for profile in [vendor(), superadmin(), limited_admin()] {
            profiles
                .profiles
                .lock()
                .expect("profiles mutex")
                .insert(profile.id.clone(), profile);
        }
        profiles
    }

    pub(super) fn get(&self, user_id: &str) -> Option<Identity> {
        self.profiles
            .lock()
            .expect("profiles mutex")
            .get(user_id)
            .cloned()
    }
}

#[async_trait]
impl ProfileDirectory for MemoryProfiles {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.get(user_id))
    }

    async fn insert_profile(&self, profile: Identity) -> Result<(), IdentityError> {
        let mut guard = self.profiles.lock().expect("profiles mutex");
        if guard.contains_key(&profile.id) {
            return Err(IdentityError::Conflict);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }
}

pub(super) fn vendor() -> Identity {
    Identity {
        company: Some("Acme Processing Ltd".to_string()),
        ..Identity::vendor("vendor-1", "privacy@acme.test")
    }
}

pub(super) fn superadmin() -> Identity {
    Identity {
        role: Role::Superadmin,
        ..Identity::vendor("admin-1", "dpo@dpovendor.test")
    }
}

pub(super) fn limited_admin() -> Identity {
    Identity {
        role: Role::LimitedAdmin,
        ..Identity::vendor("reviewer-1", "reviewer@dpovendor.test")
    }
}

pub(super) type MemoryService = ComplianceIntakeService<MemoryAdapter, MemoryProfiles>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryAdapter>, Arc<MemoryProfiles>) {
    let adapter = Arc::new(MemoryAdapter::default());
    let profiles = Arc::new(MemoryProfiles::seeded());
    let service = Arc::new(ComplianceIntakeService::new(
        compliance_sections(),
        adapter.clone(),
        profiles.clone(),
    ));
    (service, adapter, profiles)
}

pub(super) fn router() -> (axum::Router, Arc<MemoryAdapter>) {
    let (service, adapter, _) = build_service();
    (compliance_router(service), adapter)
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn empty_request(method: &str, uri: &str, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(crate::compliance::USER_ID_HEADER, user_id);
    }
    builder.body(Body::empty()).expect("valid request")
}

pub(super) async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub(super) async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("json body")
}
