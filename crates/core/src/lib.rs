//! # Patientor Core
//!
//! Core business logic for the patientor patient record service.
//!
//! This crate contains pure data operations:
//! - Loading patient and diagnosis fixtures at startup
//! - Listing and reading patients, with `ssn` hidden from list views
//! - Registering patients and appending validated medical entries
//!
//! **No API concerns**: HTTP servers and CLI handling belong in `api-rest` and `cli`.

pub mod config;
pub mod constants;
pub mod diagnosis;
pub mod error;
pub mod fixtures;
pub mod patient;
pub mod repositories;

pub use config::{data_dir_from_env_value, sick_leave_policy_from_env_value, CoreConfig};
pub use diagnosis::DiagnosisService;
pub use error::{PatientorError, PatientorResult};
pub use fixtures::Fixtures;
pub use patient::PatientService;
pub use repositories::{InMemoryPatientRepository, PatientRepository};

pub use records::SickLeavePolicy;

use std::sync::Arc;

/// The services backing one running instance, sharing a single patient store.
#[derive(Clone, Debug)]
pub struct Services {
    pub patients: PatientService,
    pub diagnoses: DiagnosisService,
}

impl Services {
    /// Loads fixtures selected by `cfg` and wires the services over an in-memory store.
    pub fn load(cfg: Arc<CoreConfig>) -> PatientorResult<Self> {
        let fixtures = Fixtures::load(&cfg)?;
        tracing::info!(
            "seeded {} patients and {} diagnoses ({})",
            fixtures.patients.len(),
            fixtures.diagnoses.len(),
            match cfg.data_dir() {
                Some(dir) => dir.display().to_string(),
                None => "bundled".to_string(),
            }
        );

        let repository = Arc::new(InMemoryPatientRepository::new(fixtures.patients));
        Ok(Self {
            patients: PatientService::new(cfg, repository),
            diagnoses: DiagnosisService::new(fixtures.diagnoses),
        })
    }
}
