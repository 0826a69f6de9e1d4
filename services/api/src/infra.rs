use async_trait::async_trait;
use dpo_vendor::auth::{Identity, IdentityError, ProfileDirectory, Role};
use dpo_vendor::config::AuthConfig;
use dpo_vendor::wizard::{
    ComplianceSubmission, DraftSubmission, StoredSubmission, SubmissionAdapter, SubmissionError,
    SubmissionId, SubmissionReceipt, SubmissionStatus,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) public_url: Url,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex.lock().map_err(|_| format!("{what} mutex poisoned"))
}

/// Process-local submission store. Drafts are keyed by owner, anonymous drafts share one slot.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    drafts: Arc<Mutex<HashMap<String, DraftSubmission>>>,
    records: Arc<Mutex<Vec<StoredSubmission>>>,
}

impl InMemorySubmissionStore {
    pub(crate) fn draft_count(&self) -> usize {
        lock(&self.drafts, "draft")
            .map(|guard| guard.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionAdapter for InMemorySubmissionStore {
    async fn save_draft(&self, draft: &DraftSubmission) -> Result<(), SubmissionError> {
        let mut guard = lock(&self.drafts, "draft").map_err(SubmissionError::Unavailable)?;
        let owner = draft.owner.clone().unwrap_or_else(|| "anonymous".to_string());
        guard.insert(owner, draft.clone());
        Ok(())
    }

    async fn submit_final(
        &self,
        submission: &ComplianceSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if submission.submitted_by.trim().is_empty() {
            return Err(SubmissionError::Rejected(
                "submission is missing its submitter".to_string(),
            ));
        }

        let mut guard = lock(&self.records, "submission").map_err(SubmissionError::Unavailable)?;
        let submission_id = SubmissionId(format!("sub-{:06}", guard.len() + 1));
        guard.push(StoredSubmission {
            id: submission_id.clone(),
            submission: submission.clone(),
        });

        Ok(SubmissionReceipt {
            submission_id,
            status: SubmissionStatus::Pending,
        })
    }

    async fn submissions(&self) -> Result<Vec<StoredSubmission>, SubmissionError> {
        let guard = lock(&self.records, "submission").map_err(SubmissionError::Unavailable)?;
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileDirectory {
    profiles: Arc<Mutex<HashMap<String, Identity>>>,
}

impl InMemoryProfileDirectory {
    /// Directory pre-loaded with the admin accounts named in configuration.
    pub(crate) fn seeded(auth: &AuthConfig) -> Self {
        let directory = Self::default();
        let admins = auth
            .superadmin_ids
            .iter()
            .map(|id| (id, Role::Superadmin))
            .chain(auth.limited_admin_ids.iter().map(|id| (id, Role::LimitedAdmin)));

        if let Ok(mut guard) = lock(&directory.profiles, "profile") {
            for (id, role) in admins {
                let profile = Identity {
                    role,
                    ..Identity::vendor(id.clone(), String::new())
                };
                guard.insert(id.clone(), profile);
            }
        }
        directory
    }

    pub(crate) fn upsert(&self, profile: Identity) {
        if let Ok(mut guard) = lock(&self.profiles, "profile") {
            guard.insert(profile.id.clone(), profile);
        }
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Identity>, IdentityError> {
        let guard = lock(&self.profiles, "profile").map_err(IdentityError::Unavailable)?;
        Ok(guard.get(user_id).cloned())
    }

    async fn insert_profile(&self, profile: Identity) -> Result<(), IdentityError> {
        let mut guard = lock(&self.profiles, "profile").map_err(IdentityError::Unavailable)?;
        if guard.contains_key(&profile.id) {
            return Err(IdentityError::Conflict);
        }
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }
}
