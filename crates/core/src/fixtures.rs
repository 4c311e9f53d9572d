//! Seed data loading.
//!
//! Patients and diagnoses are loaded once at startup, either from the JSON fixtures compiled
//! into the crate or from the directory named by [`CoreConfig::data_dir`]. Fixture files use the
//! same wire format as the API and are parsed strictly: unknown keys, bad entry tags and
//! duplicate identifiers are startup errors.

use crate::config::CoreConfig;
use crate::constants::{BUNDLED_DIAGNOSES, BUNDLED_PATIENTS, DIAGNOSES_FILENAME, PATIENTS_FILENAME};
use crate::{PatientorError, PatientorResult};
use records::{Diagnosis, Patient};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parsed seed data.
#[derive(Clone, Debug)]
pub struct Fixtures {
    pub patients: Vec<Patient>,
    pub diagnoses: Vec<Diagnosis>,
}

impl Fixtures {
    /// Loads the fixtures selected by `cfg`.
    pub fn load(cfg: &CoreConfig) -> PatientorResult<Self> {
        match cfg.data_dir() {
            Some(dir) => Self::from_dir(dir),
            None => Self::bundled(),
        }
    }

    /// Parses the fixtures compiled into the crate.
    pub fn bundled() -> PatientorResult<Self> {
        Self::parse(BUNDLED_PATIENTS, BUNDLED_DIAGNOSES)
    }

    /// Reads and parses `patients.json` and `diagnoses.json` from `dir`.
    pub fn from_dir(dir: &Path) -> PatientorResult<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| PatientorError::FixtureRead { path, source })
        };

        let patients = read(PATIENTS_FILENAME)?;
        let diagnoses = read(DIAGNOSES_FILENAME)?;
        Self::parse(&patients, &diagnoses)
    }

    /// Parses fixture JSON text.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::FixtureParse` for malformed JSON, and
    /// `PatientorError::InvalidInput` if patient ids, entry ids or diagnosis codes repeat.
    pub fn parse(patients_json: &str, diagnoses_json: &str) -> PatientorResult<Self> {
        let patients: Vec<Patient> = serde_json::from_str(patients_json)
            .map_err(|source| PatientorError::FixtureParse {
                name: "patient",
                source,
            })?;
        let diagnoses: Vec<Diagnosis> = serde_json::from_str(diagnoses_json)
            .map_err(|source| PatientorError::FixtureParse {
                name: "diagnosis",
                source,
            })?;

        ensure_unique("patient id", patients.iter().map(|p| p.id.as_str()))?;
        ensure_unique(
            "entry id",
            patients
                .iter()
                .flat_map(|p| p.entries.iter().map(|e| e.id.as_str())),
        )?;
        ensure_unique("diagnosis code", diagnoses.iter().map(|d| d.code.as_str()))?;

        tracing::debug!(
            "loaded {} patients and {} diagnoses",
            patients.len(),
            diagnoses.len()
        );

        Ok(Self {
            patients,
            diagnoses,
        })
    }
}

fn ensure_unique<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> PatientorResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(PatientorError::InvalidInput(format!(
                "duplicate {what} in fixtures: {key}"
            )));
        }
    }
    Ok(())
}
