//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into core services, so request
//! handling never reads process-wide environment variables.

use crate::constants::{DIAGNOSES_FILENAME, PATIENTS_FILENAME};
use crate::{PatientorError, PatientorResult};
use records::SickLeavePolicy;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    data_dir: Option<PathBuf>,
    sick_leave_policy: SickLeavePolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Directory holding `patients.json` and `diagnoses.json` to seed from, or
    ///   `None` to use the fixtures compiled into the binary.
    /// * `sick_leave_policy` - Treatment of malformed sick-leave values on new entries.
    ///
    /// # Errors
    ///
    /// Returns `PatientorError::InvalidInput` if `data_dir` is given but is not a directory
    /// containing both fixture files.
    pub fn new(
        data_dir: Option<PathBuf>,
        sick_leave_policy: SickLeavePolicy,
    ) -> PatientorResult<Self> {
        if let Some(dir) = &data_dir {
            validate_data_dir(dir)?;
        }

        Ok(Self {
            data_dir,
            sick_leave_policy,
        })
    }

    /// Directory overriding the bundled fixtures, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn sick_leave_policy(&self) -> SickLeavePolicy {
        self.sick_leave_policy
    }
}

fn validate_data_dir(dir: &Path) -> PatientorResult<()> {
    if !dir.is_dir() {
        return Err(PatientorError::InvalidInput(format!(
            "data directory does not exist: {}",
            dir.display()
        )));
    }

    for name in [PATIENTS_FILENAME, DIAGNOSES_FILENAME] {
        if !dir.join(name).is_file() {
            return Err(PatientorError::InvalidInput(format!(
                "data directory {} is missing {name}",
                dir.display()
            )));
        }
    }

    Ok(())
}

/// Parse the sick-leave policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default (lenient) policy.
pub fn sick_leave_policy_from_env_value(value: Option<String>) -> PatientorResult<SickLeavePolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<SickLeavePolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse the fixture directory override from an optional string value.
///
/// Empty/whitespace values mean "no override".
pub fn data_dir_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
