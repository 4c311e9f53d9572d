//! Patient repository trait and its in-memory implementation.

use crate::constants::PATIENT_NOT_FOUND;
use crate::{PatientorError, PatientorResult};
use records::{Entry, Patient};
use std::fmt::Debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage for patient records and their entries.
///
/// Implementations must keep insertion order for both patients and each patient's entries, and
/// must apply every write atomically with respect to concurrent readers.
pub trait PatientRepository: Send + Sync + Debug {
    /// Returns every patient in insertion order.
    fn list(&self) -> PatientorResult<Vec<Patient>>;

    /// Returns the patient with `id`, if present.
    fn get(&self, id: &str) -> PatientorResult<Option<Patient>>;

    /// Reports whether a patient with `id` exists.
    fn contains(&self, id: &str) -> PatientorResult<bool>;

    /// Appends a new patient record.
    fn insert(&self, patient: Patient) -> PatientorResult<()>;

    /// Appends `entry` to the entries of the patient with `id`.
    ///
    /// Returns `PatientorError::NotFound` if no such patient exists.
    fn append_entry(&self, id: &str, entry: Entry) -> PatientorResult<()>;
}

/// Process-local patient store guarded by a single read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryPatientRepository {
    patients: RwLock<Vec<Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self {
            patients: RwLock::new(patients),
        }
    }

    fn read(&self) -> PatientorResult<RwLockReadGuard<'_, Vec<Patient>>> {
        self.patients
            .read()
            .map_err(|_| PatientorError::StorePoisoned)
    }

    fn write(&self) -> PatientorResult<RwLockWriteGuard<'_, Vec<Patient>>> {
        self.patients
            .write()
            .map_err(|_| PatientorError::StorePoisoned)
    }
}

impl PatientRepository for InMemoryPatientRepository {
    fn list(&self) -> PatientorResult<Vec<Patient>> {
        Ok(self.read()?.clone())
    }

    fn get(&self, id: &str) -> PatientorResult<Option<Patient>> {
        Ok(self.read()?.iter().find(|p| p.id == id).cloned())
    }

    fn contains(&self, id: &str) -> PatientorResult<bool> {
        Ok(self.read()?.iter().any(|p| p.id == id))
    }

    fn insert(&self, patient: Patient) -> PatientorResult<()> {
        self.write()?.push(patient);
        Ok(())
    }

    fn append_entry(&self, id: &str, entry: Entry) -> PatientorResult<()> {
        let mut patients = self.write()?;
        let patient = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PatientorError::NotFound(PATIENT_NOT_FOUND.into()))?;

        patient.entries.push(entry);
        Ok(())
    }
}
