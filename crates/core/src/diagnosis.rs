//! Diagnosis reference data.

use records::Diagnosis;
use std::sync::Arc;

/// Read-only access to the diagnosis codes loaded at startup.
#[derive(Clone, Debug)]
pub struct DiagnosisService {
    diagnoses: Arc<[Diagnosis]>,
}

impl DiagnosisService {
    pub fn new(diagnoses: Vec<Diagnosis>) -> Self {
        Self {
            diagnoses: diagnoses.into(),
        }
    }

    /// Returns every diagnosis in fixture order.
    pub fn list(&self) -> Vec<Diagnosis> {
        self.diagnoses.to_vec()
    }

    /// Looks up a diagnosis by its exact code.
    pub fn find(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.iter().find(|d| d.code == code)
    }
}
