//! Vendor data-protection compliance intake.
//!
//! The [`wizard`] module holds the step-sequencing engine and its collaborator traits, the
//! [`compliance`] module wires the data-protection section catalog into an HTTP-facing intake
//! service, and [`auth`] resolves identities and roles for the submission gate.

pub mod auth;
pub mod compliance;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod wizard;
