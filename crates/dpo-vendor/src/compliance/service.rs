use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::catalog::{section_summaries, SectionSummary};
use super::export::{submissions_csv, ExportError};
use crate::auth::{
    resolve_landing, AuthUser, Identity, IdentityError, Landing, Permission, ProfileDirectory,
    SignedInUser,
};
use crate::wizard::{
    ActionOutcome, FieldEdit, FormWizard, SectionData, SectionDescriptor, SectionId,
    StoredSubmission, SubmissionAdapter, SubmissionError, SubmittedForm, WizardError, WizardView,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wizard view tagged with the session it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub wizard: WizardView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Advance,
    Retreat,
    Jump(usize),
}

type IntakeWizard<A, P> = FormWizard<A, SignedInUser<P>>;

/// Hosts one wizard per intake session and gates admin reads on role.
pub struct ComplianceIntakeService<A, P> {
    sections: Vec<SectionDescriptor>,
    adapter: Arc<A>,
    profiles: Arc<P>,
    sessions: Mutex<HashMap<SessionId, IntakeWizard<A, P>>>,
}

impl<A, P> ComplianceIntakeService<A, P>
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    pub fn new(sections: Vec<SectionDescriptor>, adapter: Arc<A>, profiles: Arc<P>) -> Self {
        Self {
            sections,
            adapter,
            profiles,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn sections(&self) -> Vec<SectionSummary> {
        section_summaries(&self.sections)
    }

    /// Start a fresh wizard; `user` is whoever the auth provider says is signed in.
    pub fn open_session(&self, user: Option<AuthUser>) -> Result<SessionSnapshot, IntakeError> {
        let identity = Arc::new(SignedInUser::new(self.profiles.clone(), user));
        let wizard = FormWizard::new(self.sections.clone(), self.adapter.clone(), identity)?;
        let session_id = SessionId::generate();
        let snapshot = SessionSnapshot {
            session_id: session_id.clone(),
            wizard: wizard.view(),
        };

        self.lock_sessions()?.insert(session_id.clone(), wizard);
        info!(%session_id, "compliance intake session opened");
        Ok(snapshot)
    }

    pub fn close_session(&self, session_id: &SessionId) -> Result<(), IntakeError> {
        self.lock_sessions()?
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| IntakeError::SessionNotFound(session_id.clone()))
    }

    pub fn snapshot(&self, session_id: &SessionId) -> Result<SessionSnapshot, IntakeError> {
        self.with_session(session_id, |_| Ok(()))
    }

    pub fn replace_section(
        &self,
        session_id: &SessionId,
        section_id: SectionId,
        data: SectionData,
    ) -> Result<SessionSnapshot, IntakeError> {
        self.with_session(session_id, |wizard| {
            wizard.update_section(section_id, data)?;
            Ok(())
        })
    }

    pub fn edit(
        &self,
        session_id: &SessionId,
        edit: FieldEdit,
    ) -> Result<SessionSnapshot, IntakeError> {
        self.with_session(session_id, |wizard| {
            wizard.edit_active(edit);
            Ok(())
        })
    }

    pub fn navigate(
        &self,
        session_id: &SessionId,
        navigation: Navigation,
    ) -> Result<SessionSnapshot, IntakeError> {
        self.with_session(session_id, |wizard| {
            match navigation {
                Navigation::Advance => {
                    wizard.advance();
                }
                Navigation::Retreat => {
                    wizard.retreat();
                }
                Navigation::Jump(index) => {
                    wizard.jump_to(index)?;
                }
            }
            Ok(())
        })
    }

    /// Save a draft. The session lock is released before the adapter is awaited.
    pub async fn save(&self, session_id: &SessionId) -> Result<ActionOutcome<()>, IntakeError> {
        let pending = {
            let sessions = self.lock_sessions()?;
            let wizard = sessions
                .get(session_id)
                .ok_or_else(|| IntakeError::SessionNotFound(session_id.clone()))?;
            wizard.save()
        };
        Ok(pending.await)
    }

    pub async fn submit(
        &self,
        session_id: &SessionId,
    ) -> Result<ActionOutcome<SubmittedForm>, IntakeError> {
        let pending = {
            let sessions = self.lock_sessions()?;
            let wizard = sessions
                .get(session_id)
                .ok_or_else(|| IntakeError::SessionNotFound(session_id.clone()))?;
            wizard.submit()
        };
        let outcome = pending.await;

        // Completed forms end the session.
        if outcome.is_completed() && self.lock_sessions()?.remove(session_id).is_some() {
            info!(%session_id, "compliance intake session closed after submission");
        }
        Ok(outcome)
    }

    pub async fn landing(&self, user_id: &str, email: Option<&str>) -> Landing {
        resolve_landing(self.profiles.as_ref(), user_id, email).await
    }

    /// All submissions, for holders of `view_all`.
    pub async fn submissions(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<StoredSubmission>, IntakeError> {
        self.authorize(user_id, Permission::ViewAll).await?;
        Ok(self.adapter.submissions().await?)
    }

    /// CSV download of all submissions, for holders of `download_data`.
    pub async fn export_csv(&self, user_id: Option<&str>) -> Result<String, IntakeError> {
        self.authorize(user_id, Permission::DownloadData).await?;
        let records = self.adapter.submissions().await?;
        Ok(submissions_csv(&records)?)
    }

    async fn authorize(
        &self,
        user_id: Option<&str>,
        permission: Permission,
    ) -> Result<Identity, IntakeError> {
        let user_id = user_id.ok_or(IntakeError::Unauthenticated)?;
        let identity = self
            .profiles
            .fetch_profile(user_id)
            .await?
            .ok_or(IntakeError::Unauthenticated)?;

        if identity.has_permission(permission) {
            Ok(identity)
        } else {
            Err(IntakeError::Forbidden { permission })
        }
    }

    fn with_session<F>(
        &self,
        session_id: &SessionId,
        apply: F,
    ) -> Result<SessionSnapshot, IntakeError>
    where
        F: FnOnce(&mut IntakeWizard<A, P>) -> Result<(), IntakeError>,
    {
        let mut sessions = self.lock_sessions()?;
        let wizard = sessions
            .get_mut(session_id)
            .ok_or_else(|| IntakeError::SessionNotFound(session_id.clone()))?;
        apply(wizard)?;
        Ok(SessionSnapshot {
            session_id: session_id.clone(),
            wizard: wizard.view(),
        })
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<SessionId, IntakeWizard<A, P>>>, IntakeError>
    {
        self.sessions
            .lock()
            .map_err(|_| IntakeError::Unavailable("session store poisoned".to_string()))
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("intake session '{0}' not found")]
    SessionNotFound(SessionId),
    #[error("sign in required")]
    Unauthenticated,
    #[error("missing permission '{}'", .permission.label())]
    Forbidden { permission: Permission },
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("intake service unavailable: {0}")]
    Unavailable(String),
}
