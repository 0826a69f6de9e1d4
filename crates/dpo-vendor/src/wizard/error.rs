use std::fmt;

use serde::Serialize;

use super::section::SectionId;
use super::submission::SubmissionError;
use crate::auth::IdentityError;

/// User actions gated on the wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    Save,
    Submit,
}

impl fmt::Display for WizardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardAction::Save => f.write_str("save"),
            WizardAction::Submit => f.write_str("submit"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WizardError {
    #[error("a wizard needs at least one section")]
    EmptySections,
    #[error("section '{0}' appears more than once")]
    DuplicateSection(SectionId),
    #[error("unknown section '{0}'")]
    UnknownSection(SectionId),
    #[error("step {index} is out of range for a {len}-step form")]
    NavigationBounds { index: usize, len: usize },
    #[error("{action} is not available on step {}", .cursor + 1)]
    ActionUnavailable { action: WizardAction, cursor: usize },
    #[error("a submission is already in progress")]
    SubmitInFlight,
    #[error("You must be logged in to submit a form")]
    IdentityUnavailable,
    #[error("unable to resolve the signed-in user: {0}")]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
