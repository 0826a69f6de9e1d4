//! Data-protection compliance intake built on the generic wizard.
//!
//! The catalog supplies the thirteen attestation sections, the service keeps one wizard per
//! intake session, and the router exposes both over HTTP alongside the admin submission views.

mod catalog;
pub mod export;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{compliance_sections, section_summaries, SectionSummary};
pub use export::{submissions_csv, ExportError};
pub use router::{compliance_router, USER_EMAIL_HEADER, USER_ID_HEADER};
pub use service::{
    ComplianceIntakeService, IntakeError, Navigation, SessionId, SessionSnapshot,
};
