//! Patient wire models and the patient creation parser.
//!
//! Responsibilities:
//! - Define the full [`Patient`] record and its non-sensitive projection [`PatientSummary`]
//! - Parse untyped creation payloads into a validated [`NewPatient`]
//!
//! Notes:
//! - `ssn` is sensitive and never appears in [`PatientSummary`]
//! - Entries are append-only; nothing in this module removes or edits them

use crate::entry::Entry;
use crate::payload::{deserialize, require_keys, require_object};
use crate::{RecordsError, RecordsResult};
use patientor_types::NonEmptyText;
use patientor_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Administrative gender of a patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Wire format string.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Parse from wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::from_wire(s)
            .ok_or_else(|| RecordsError::Validation(format!("invalid gender: '{s}'")))
    }
}

/// A full patient record, including the sensitive `ssn`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Patient {
    #[schema(value_type = String)]
    pub id: RecordId,

    pub name: String,

    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,

    pub ssn: String,

    pub gender: Gender,

    pub occupation: String,

    /// Medical entries in insertion order.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// A patient without the sensitive `ssn`, as returned by list views.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientSummary {
    #[schema(value_type = String)]
    pub id: RecordId,

    pub name: String,

    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,

    pub gender: Gender,

    pub occupation: String,

    pub entries: Vec<Entry>,
}

impl Patient {
    /// Projects the patient to its non-sensitive summary.
    pub fn summary(&self) -> PatientSummary {
        PatientSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            gender: self.gender,
            occupation: self.occupation.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        patient.summary()
    }
}

/// A validated patient creation request, not yet assigned an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub date_of_birth: NonEmptyText,
    pub ssn: NonEmptyText,
    pub gender: Gender,
    pub occupation: NonEmptyText,
}

const NOT_AN_OBJECT: &str = "incorrect or missing data";
const MISSING_FIELDS: &str = "incorrect data: some fields are missing";
const REQUIRED_FIELDS: [&str; 5] = ["name", "dateOfBirth", "ssn", "gender", "occupation"];

impl NewPatient {
    /// Parse a patient creation payload.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::Validation`] if:
    /// - the payload is not a JSON object,
    /// - any of `name`, `dateOfBirth`, `ssn`, `gender`, `occupation` is missing,
    /// - a string field is not a non-empty string,
    /// - `gender` is not one of `male`, `female`, `other`.
    pub fn parse(payload: &serde_json::Value) -> RecordsResult<Self> {
        let object = require_object(payload, NOT_AN_OBJECT)?;
        require_keys(object, &REQUIRED_FIELDS, MISSING_FIELDS)?;

        let wire: NewPatientWire = deserialize(payload, "patient", "")?;
        Ok(Self {
            name: wire.name,
            date_of_birth: wire.date_of_birth,
            ssn: wire.ssn,
            gender: wire.gender,
            occupation: wire.occupation,
        })
    }

    /// Builds the stored record with the given identifier and an empty entry list.
    pub fn into_patient(self, id: RecordId) -> Patient {
        Patient {
            id,
            name: self.name.into_inner(),
            date_of_birth: self.date_of_birth.into_inner(),
            ssn: self.ssn.into_inner(),
            gender: self.gender,
            occupation: self.occupation.into_inner(),
            entries: Vec::new(),
        }
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Creation payload shape. Unknown keys (including a client-supplied `id`) are ignored.
#[derive(Deserialize)]
struct NewPatientWire {
    name: NonEmptyText,
    #[serde(rename = "dateOfBirth")]
    date_of_birth: NonEmptyText,
    ssn: NonEmptyText,
    gender: Gender,
    occupation: NonEmptyText,
}
