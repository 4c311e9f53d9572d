//! Patient record models and payload parsers.
//!
//! This crate provides the **wire models** exchanged over the API and stored in memory, and the
//! **parsers** that turn untrusted JSON payloads into those models:
//! - [`Patient`] / [`PatientSummary`] with [`NewPatient`] for patient creation
//! - [`Diagnosis`] reference data
//! - [`Entry`], a tagged union over the three medical entry kinds, with [`NewEntry`] for entry
//!   submission
//!
//! Parsers never coerce: a field that should be a string must be a non-empty JSON string, and
//! the health-check rating must be one of the integers 0 to 3. Every parser failure is reported
//! as [`RecordsError::Validation`] with a message naming the offending field.
//!
//! This crate has no notion of storage; identifiers for new records are supplied by the caller.

pub mod diagnosis;
pub mod entry;
pub mod patient;

mod payload;

// Re-export public domain-level types
pub use diagnosis::Diagnosis;
pub use entry::{
    Discharge, Entry, EntryDetails, HealthCheckRating, NewEntry, SickLeave, SickLeavePolicy,
};
pub use patient::{Gender, NewPatient, Patient, PatientSummary};

pub use patientor_uuid::RecordId;

/// Errors returned by the `records` crate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordsError {
    /// A payload failed a required-field, type or enum check.
    #[error("{0}")]
    Validation(String),

    /// A configuration value could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Type alias for Results that can fail with a [`RecordsError`].
pub type RecordsResult<T> = Result<T, RecordsError>;
