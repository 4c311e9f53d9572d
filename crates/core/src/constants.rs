//! Constants used throughout the patientor core crate.

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3001";

/// Filename of the patient fixtures inside a data directory.
pub const PATIENTS_FILENAME: &str = "patients.json";

/// Filename of the diagnosis fixtures inside a data directory.
pub const DIAGNOSES_FILENAME: &str = "diagnoses.json";

/// Message of the error returned when a patient id does not resolve.
pub const PATIENT_NOT_FOUND: &str = "Patient not found";

/// Patient fixtures compiled into the binary.
pub(crate) const BUNDLED_PATIENTS: &str = include_str!("../data/patients.json");

/// Diagnosis fixtures compiled into the binary.
pub(crate) const BUNDLED_DIAGNOSES: &str = include_str!("../data/diagnoses.json");
