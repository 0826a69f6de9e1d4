use serde::Serialize;

use super::error::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Transient user-facing message raised by save and submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    fn new(title: &str, description: impl Into<String>, variant: NoticeVariant) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            variant,
        }
    }

    pub(crate) fn draft_saved() -> Self {
        Self::new(
            "Form Saved",
            "Your progress has been saved. You can continue later.",
            NoticeVariant::Default,
        )
    }

    pub(crate) fn draft_failed(error: &WizardError) -> Self {
        let description = match error {
            WizardError::Submission(_) => {
                "There was an error saving your form. Please try again.".to_string()
            }
            other => other.to_string(),
        };
        Self::new("Save Failed", description, NoticeVariant::Destructive)
    }

    pub(crate) fn submitted() -> Self {
        Self::new(
            "Form Submitted Successfully",
            "Your compliance form has been submitted for review.",
            NoticeVariant::Default,
        )
    }

    pub(crate) fn submit_failed(error: &WizardError) -> Self {
        Self::new(
            "Submission Failed",
            error.to_string(),
            NoticeVariant::Destructive,
        )
    }
}

/// Result of a save or submit once collaborator failures have been absorbed.
#[derive(Debug, Clone)]
pub enum ActionOutcome<T> {
    Completed { value: T, notice: Notice },
    Failed { error: WizardError, notice: Notice },
}

impl<T> ActionOutcome<T> {
    pub fn notice(&self) -> &Notice {
        match self {
            ActionOutcome::Completed { notice, .. } | ActionOutcome::Failed { notice, .. } => {
                notice
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed { .. })
    }

    pub fn into_result(self) -> Result<T, WizardError> {
        match self {
            ActionOutcome::Completed { value, .. } => Ok(value),
            ActionOutcome::Failed { error, .. } => Err(error),
        }
    }
}
