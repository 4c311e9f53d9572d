//! Patient service.
//!
//! This module provides the main service for patient operations: listing patients, reading a
//! single record, registering new patients and appending medical entries.

use crate::{
    constants::PATIENT_NOT_FOUND, repositories::PatientRepository, CoreConfig, PatientorError,
    PatientorResult,
};
use patientor_uuid::{IdGenerator, RandomIdGenerator};
use records::{Entry, NewEntry, NewPatient, Patient, PatientSummary};
use serde_json::Value;
use std::sync::Arc;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService {
    cfg: Arc<CoreConfig>,
    repository: Arc<dyn PatientRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl PatientService {
    /// Creates a new instance of PatientService that assigns random v4 identifiers.
    pub fn new(cfg: Arc<CoreConfig>, repository: Arc<dyn PatientRepository>) -> Self {
        Self::with_id_generator(cfg, repository, Arc::new(RandomIdGenerator::new()))
    }

    /// Creates a PatientService with an explicit identifier source.
    pub fn with_id_generator(
        cfg: Arc<CoreConfig>,
        repository: Arc<dyn PatientRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            cfg,
            repository,
            ids,
        }
    }

    /// Lists every patient without the `ssn`, in insertion order.
    pub fn list_patients(&self) -> PatientorResult<Vec<PatientSummary>> {
        let patients = self.repository.list()?;
        Ok(patients.iter().map(PatientSummary::from).collect())
    }

    /// Returns the full record, including `ssn` and entries, for `id`.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::NotFound` if no patient has this id.
    pub fn get_patient(&self, id: &str) -> PatientorResult<Patient> {
        self.repository
            .get(id)?
            .ok_or_else(|| PatientorError::NotFound(PATIENT_NOT_FOUND.into()))
    }

    /// Validates `payload` and stores it as a new patient with a fresh id and no entries.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::Validation` if the payload is not a valid patient; nothing is
    /// stored in that case.
    pub fn create_patient(&self, payload: &Value) -> PatientorResult<Patient> {
        let new_patient = NewPatient::parse(payload)?;
        let patient = new_patient.into_patient(self.ids.next_id());

        self.repository.insert(patient.clone())?;
        tracing::info!("created patient {}", patient.id);

        Ok(patient)
    }

    /// Validates `payload` as a medical entry and appends it to the patient with `id`.
    ///
    /// Returns the stored entry, including its generated identifier.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::NotFound` if the patient does not exist (checked before the payload
    /// is looked at), or `PatientorError::Validation` if the entry is invalid.
    pub fn add_entry(&self, id: &str, payload: &Value) -> PatientorResult<Entry> {
        if !self.repository.contains(id)? {
            return Err(PatientorError::NotFound(PATIENT_NOT_FOUND.into()));
        }

        let new_entry = NewEntry::parse(payload, self.cfg.sick_leave_policy())?;
        let entry = new_entry.into_entry(self.ids.next_id());

        self.repository.append_entry(id, entry.clone())?;
        tracing::info!("added {} entry {} to patient {}", entry.kind(), entry.id, id);

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryPatientRepository;
    use crate::Fixtures;
    use patientor_uuid::SequentialIdGenerator;
    use records::{EntryDetails, Gender, SickLeavePolicy};
    use serde_json::json;

    const JOHN: &str = "d2773336-f723-11e9-8f0b-362b9e155667";

    fn service_with_policy(policy: SickLeavePolicy) -> PatientService {
        let cfg = Arc::new(CoreConfig::new(None, policy).expect("default config"));
        let fixtures = Fixtures::bundled().expect("bundled fixtures");
        let repository = Arc::new(InMemoryPatientRepository::new(fixtures.patients));
        let ids = Arc::new(SequentialIdGenerator::new("test").expect("valid prefix"));
        PatientService::with_id_generator(cfg, repository, ids)
    }

    fn service() -> PatientService {
        service_with_policy(SickLeavePolicy::Lenient)
    }

    fn ada() -> Value {
        json!({
            "name": "Ada",
            "dateOfBirth": "1815-12-10",
            "ssn": "101215-000X",
            "gender": "female",
            "occupation": "Mathematician"
        })
    }

    #[test]
    fn list_patients_hides_ssn_and_is_stable() {
        let service = service();

        let first = service.list_patients().unwrap();
        let second = service.list_patients().unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);

        let value = serde_json::to_value(&first).unwrap();
        for patient in value.as_array().unwrap() {
            assert!(patient.get("ssn").is_none());
            assert!(patient.get("entries").is_some());
        }
    }

    #[test]
    fn get_patient_returns_full_record() {
        let patient = service().get_patient(JOHN).unwrap();
        assert_eq!(patient.name, "John McClane");
        assert_eq!(patient.ssn, "090786-122X");
        assert_eq!(patient.entries.len(), 1);
    }

    #[test]
    fn get_unknown_patient_is_not_found() {
        let err = service().get_patient("nonexistent").unwrap_err();
        assert!(matches!(err, PatientorError::NotFound(ref msg) if msg == PATIENT_NOT_FOUND));
    }

    #[test]
    fn create_patient_assigns_id_and_grows_list() {
        let service = service();

        let created = service.create_patient(&ada()).unwrap();
        assert_eq!(created.id, "test-00000001");
        assert_eq!(created.gender, Gender::Female);
        assert!(created.entries.is_empty());

        let listed = service.list_patients().unwrap();
        assert_eq!(listed.len(), 6);
        assert_eq!(listed.last().map(|p| p.id.clone()), Some(created.id.clone()));
        assert_eq!(service.get_patient(created.id.as_str()).unwrap(), created);
    }

    #[test]
    fn rejected_patient_leaves_store_unchanged() {
        let service = service();
        let mut payload = ada();
        payload["gender"] = json!("unknown");

        let err = service.create_patient(&payload).unwrap_err();
        assert!(matches!(err, PatientorError::Validation(_)));
        assert_eq!(service.list_patients().unwrap().len(), 5);
    }

    #[test]
    fn add_entry_appends_in_order() {
        let service = service();
        let payload = json!({
            "type": "HealthCheck",
            "description": "Yearly control visit",
            "date": "2019-10-20",
            "specialist": "MD House",
            "healthCheckRating": 2
        });

        let added = service.add_entry(JOHN, &payload).unwrap();
        assert_eq!(added.id, "test-00000001");
        assert_eq!(added.kind(), "HealthCheck");
        assert_eq!(added.description, "Yearly control visit");

        let patient = service.get_patient(JOHN).unwrap();
        assert_eq!(patient.entries.len(), 2);
        assert_eq!(patient.entries.last(), Some(&added));
    }

    #[test]
    fn concurrent_add_entry_keeps_every_entry() {
        const WRITERS: usize = 16;
        let service = service();

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let service = service.clone();
                std::thread::spawn(move || {
                    let payload = json!({
                        "type": "HealthCheck",
                        "description": format!("Check {i}"),
                        "date": "2019-10-20",
                        "specialist": "MD House",
                        "healthCheckRating": 0
                    });
                    service.add_entry(JOHN, &payload).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = service.get_patient(JOHN).unwrap().entries;
        assert_eq!(entries.len(), 1 + WRITERS);

        let ids: std::collections::HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), entries.len());
    }

    #[test]
    fn whitespace_only_description_is_stored() {
        let service = service();
        let payload = json!({
            "type": "HealthCheck",
            "description": "   ",
            "date": "2019-10-20",
            "specialist": "MD House",
            "healthCheckRating": 2
        });

        let added = service.add_entry(JOHN, &payload).unwrap();
        assert_eq!(added.description, "   ");
        assert_eq!(service.get_patient(JOHN).unwrap().entries.len(), 2);
    }

    #[test]
    fn add_entry_checks_patient_before_payload() {
        let err = service()
            .add_entry("nonexistent", &json!("not an entry"))
            .unwrap_err();
        assert!(matches!(err, PatientorError::NotFound(_)));
    }

    #[test]
    fn invalid_entry_leaves_patient_unchanged() {
        let service = service();
        let payload = json!({
            "type": "Hospital",
            "description": "d",
            "date": "2020-01-01",
            "specialist": "s"
        });

        let err = service.add_entry(JOHN, &payload).unwrap_err();
        assert!(matches!(err, PatientorError::Validation(_)));
        assert_eq!(service.get_patient(JOHN).unwrap().entries.len(), 1);
    }

    #[test]
    fn sick_leave_policy_comes_from_config() {
        let payload = json!({
            "type": "OccupationalHealthcare",
            "description": "d",
            "date": "2020-01-01",
            "specialist": "s",
            "employerName": "ACME",
            "sickLeave": {"startDate": "2020-01-01"}
        });

        let lenient = service_with_policy(SickLeavePolicy::Lenient);
        let added = lenient.add_entry(JOHN, &payload).unwrap();
        assert_eq!(
            added.details,
            EntryDetails::OccupationalHealthcare {
                employer_name: "ACME".into(),
                sick_leave: None
            }
        );

        let strict = service_with_policy(SickLeavePolicy::Strict);
        let err = strict.add_entry(JOHN, &payload).unwrap_err();
        assert!(matches!(err, PatientorError::Validation(_)));
    }
}
