use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::{WizardAction, WizardError};
use super::notice::{ActionOutcome, Notice};
use super::section::{FieldEdit, SectionData, SectionDescriptor, SectionId, SectionRender};
use super::state::FormState;
use super::submission::{
    ComplianceSubmission, DraftSubmission, SubmissionAdapter, SubmissionReceipt,
};
use crate::auth::IdentityProvider;

/// Where the client goes after a successful final submit.
pub const SUBMISSION_SUCCESS_PATH: &str = "/vendor/submission-success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedForm {
    pub receipt: SubmissionReceipt,
    pub redirect_to: &'static str,
}

/// Position of a navigator entry relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMarker {
    Passed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigatorEntry {
    pub index: usize,
    pub number: usize,
    pub section_id: SectionId,
    pub label: String,
    pub marker: StepMarker,
}

/// Everything a client needs to draw the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub step: usize,
    pub total_steps: usize,
    pub progress_percent: u8,
    pub section_id: SectionId,
    pub title: String,
    pub description: String,
    pub render: SectionRender,
    pub can_retreat: bool,
    pub can_advance: bool,
    pub can_save: bool,
    pub can_submit: bool,
    pub navigator: Vec<NavigatorEntry>,
}

/// Step-sequencing engine over an ordered list of pluggable sections.
///
/// The cursor always names a valid section. Section sub-states are only ever replaced, and
/// `save`/`submit` hand the adapter the whole aggregate. Both return futures that own a snapshot
/// of the state, so callers may keep navigating while a call is outstanding.
pub struct FormWizard<A, I> {
    sections: Vec<SectionDescriptor>,
    cursor: usize,
    state: FormState,
    adapter: Arc<A>,
    identity: Arc<I>,
    submit_in_flight: Arc<AtomicBool>,
}

impl<A, I> FormWizard<A, I>
where
    A: SubmissionAdapter + 'static,
    I: IdentityProvider + 'static,
{
    pub fn new(
        sections: Vec<SectionDescriptor>,
        adapter: Arc<A>,
        identity: Arc<I>,
    ) -> Result<Self, WizardError> {
        if sections.is_empty() {
            return Err(WizardError::EmptySections);
        }

        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(&section.id) {
                return Err(WizardError::DuplicateSection(section.id.clone()));
            }
        }

        Ok(Self {
            sections,
            cursor: 0,
            state: FormState::new(),
            adapter,
            identity,
            submit_in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    pub fn active_section(&self) -> &SectionDescriptor {
        &self.sections[self.cursor]
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_first_step(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor == self.last_index()
    }

    fn last_index(&self) -> usize {
        self.sections.len() - 1
    }

    /// Move forward one step; stays put on the last step.
    pub fn advance(&mut self) -> usize {
        if self.cursor < self.last_index() {
            self.cursor += 1;
            debug!(cursor = self.cursor, "wizard advanced");
        }
        self.cursor
    }

    /// Move back one step; stays put on the first step.
    pub fn retreat(&mut self) -> usize {
        if self.cursor > 0 {
            self.cursor -= 1;
            debug!(cursor = self.cursor, "wizard retreated");
        }
        self.cursor
    }

    /// Jump to any step, visited or not. Out-of-range indices are rejected.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, WizardError> {
        let len = self.sections.len();
        if index >= len {
            return Err(WizardError::NavigationBounds { index, len });
        }
        self.cursor = index;
        debug!(cursor = index, "wizard jumped");
        Ok(index)
    }

    /// Replace (never merge) the sub-state stored for `section_id`.
    pub fn update_section(
        &mut self,
        section_id: SectionId,
        data: SectionData,
    ) -> Result<(), WizardError> {
        if !self.sections.iter().any(|section| section.id == section_id) {
            return Err(WizardError::UnknownSection(section_id));
        }
        self.state.replace(section_id, data);
        Ok(())
    }

    /// Sub-state for `section_id`, or an empty object if it was never written.
    pub fn section_data(&self, section_id: &SectionId) -> SectionData {
        self.state.get(section_id).cloned().unwrap_or_default()
    }

    pub fn render_active(&self) -> SectionRender {
        let section = self.active_section();
        section.view.render(&self.section_data(&section.id))
    }

    /// Route an edit through the active view; returns whether the view reported a change.
    pub fn edit_active(&mut self, edit: FieldEdit) -> bool {
        let section = self.active_section();
        let view = Arc::clone(&section.view);
        let section_id = section.id.clone();
        let current = self.section_data(&section_id);

        let mut replacement = None;
        view.edit(&current, edit, &mut |next| replacement = Some(next));

        match replacement {
            Some(next) => {
                self.state.replace(section_id, next);
                true
            }
            None => false,
        }
    }

    /// Display-only completion fraction, `(cursor + 1) / len`.
    pub fn progress(&self) -> f32 {
        (self.cursor + 1) as f32 / self.sections.len() as f32
    }

    pub fn progress_percent(&self) -> u8 {
        (self.progress() * 100.0).round() as u8
    }

    pub fn navigator(&self) -> Vec<NavigatorEntry> {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, section)| NavigatorEntry {
                index,
                number: index + 1,
                section_id: section.id.clone(),
                label: section.short_label().to_string(),
                marker: match index.cmp(&self.cursor) {
                    std::cmp::Ordering::Less => StepMarker::Passed,
                    std::cmp::Ordering::Equal => StepMarker::Current,
                    std::cmp::Ordering::Greater => StepMarker::Upcoming,
                },
            })
            .collect()
    }

    pub fn view(&self) -> WizardView {
        let section = self.active_section();
        WizardView {
            step: self.cursor + 1,
            total_steps: self.sections.len(),
            progress_percent: self.progress_percent(),
            section_id: section.id.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            render: self.render_active(),
            can_retreat: !self.is_first_step(),
            can_advance: !self.is_last_step(),
            can_save: !self.is_last_step(),
            can_submit: self.is_last_step(),
            navigator: self.navigator(),
        }
    }

    /// Save the full aggregate as a draft. Not offered on the final step.
    pub fn save(&self) -> impl Future<Output = ActionOutcome<()>> + Send + 'static {
        let availability = if self.is_last_step() {
            Err(WizardError::ActionUnavailable {
                action: WizardAction::Save,
                cursor: self.cursor,
            })
        } else {
            Ok(())
        };
        let form_data = self.state.clone();
        let current_step = self.cursor;
        let adapter = Arc::clone(&self.adapter);
        let identity = Arc::clone(&self.identity);

        async move {
            if let Err(error) = availability {
                return save_failed(error);
            }

            let owner = match identity.current_identity().await {
                Ok(found) => found.map(|identity| identity.id),
                Err(err) => {
                    debug!(error = %err, "saving draft without an owner");
                    None
                }
            };

            let draft = DraftSubmission {
                form_data,
                current_step,
                owner,
                saved_at: Utc::now(),
            };

            match adapter.save_draft(&draft).await {
                Ok(()) => {
                    info!(
                        sections = draft.form_data.len(),
                        step = current_step + 1,
                        "compliance draft saved"
                    );
                    ActionOutcome::Completed {
                        value: (),
                        notice: Notice::draft_saved(),
                    }
                }
                Err(err) => save_failed(err.into()),
            }
        }
    }

    /// Finalize the form. Only offered on the last step and only once at a time.
    ///
    /// Sections that were never visited are simply absent from the submitted payload.
    pub fn submit(&self) -> impl Future<Output = ActionOutcome<SubmittedForm>> + Send + 'static {
        let claim = if self.is_last_step() {
            InFlightGuard::claim(&self.submit_in_flight).ok_or(WizardError::SubmitInFlight)
        } else {
            Err(WizardError::ActionUnavailable {
                action: WizardAction::Submit,
                cursor: self.cursor,
            })
        };
        let form_data = self.state.clone();
        let section_order: Vec<SectionId> =
            self.sections.iter().map(|section| section.id.clone()).collect();
        let adapter = Arc::clone(&self.adapter);
        let identity = Arc::clone(&self.identity);

        async move {
            let _guard = match claim {
                Ok(guard) => guard,
                Err(error) => return submit_failed(error),
            };

            let identity = match identity.current_identity().await {
                Ok(Some(identity)) => identity,
                Ok(None) => return submit_failed(WizardError::IdentityUnavailable),
                Err(err) => return submit_failed(err.into()),
            };

            let submission =
                ComplianceSubmission::from_form(&identity, form_data, &section_order, Utc::now());

            match adapter.submit_final(&submission).await {
                Ok(receipt) => {
                    info!(
                        submission_id = %receipt.submission_id,
                        vendor = %submission.vendor_name,
                        sections = submission.form_data.len(),
                        "compliance form submitted"
                    );
                    ActionOutcome::Completed {
                        value: SubmittedForm {
                            receipt,
                            redirect_to: SUBMISSION_SUCCESS_PATH,
                        },
                        notice: Notice::submitted(),
                    }
                }
                Err(err) => submit_failed(err.into()),
            }
        }
    }
}

fn save_failed(error: WizardError) -> ActionOutcome<()> {
    warn!(error = %error, "compliance draft save failed");
    let notice = Notice::draft_failed(&error);
    ActionOutcome::Failed { error, notice }
}

fn submit_failed(error: WizardError) -> ActionOutcome<SubmittedForm> {
    warn!(error = %error, "compliance submission failed");
    let notice = Notice::submit_failed(&error);
    ActionOutcome::Failed { error, notice }
}

/// Marks a submit as outstanding until dropped.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn claim(flag: &Arc<AtomicBool>) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(Arc::clone(flag)))
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
