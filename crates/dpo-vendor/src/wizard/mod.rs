//! Step-sequencing form wizard.
//!
//! A [`FormWizard`] walks an ordered list of [`SectionDescriptor`]s, keeps each section's
//! sub-state in a [`FormState`] aggregate, and hands that aggregate to a [`SubmissionAdapter`]
//! on save or submit. Identity and persistence are injected at construction so the engine has no
//! ambient state.

mod engine;
mod error;
mod notice;
mod section;
mod state;
mod submission;

#[cfg(test)]
mod tests;

pub use engine::{
    FormWizard, NavigatorEntry, StepMarker, SubmittedForm, WizardView, SUBMISSION_SUCCESS_PATH,
};
pub use error::{WizardAction, WizardError};
pub use notice::{ActionOutcome, Notice, NoticeVariant};
pub use section::{
    FieldEdit, FieldKind, FieldListView, FieldRender, FieldSpec, SectionData, SectionDescriptor,
    SectionId, SectionRender, SectionView,
};
pub use state::FormState;
pub use submission::{
    ComplianceSubmission, DraftSubmission, StoredSubmission, SubmissionAdapter, SubmissionError,
    SubmissionId, SubmissionReceipt, SubmissionStatus,
};
