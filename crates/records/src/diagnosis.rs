//! Diagnosis reference data.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A diagnosis code with its human-readable name.
///
/// Diagnoses are read-only reference data seeded at startup. Entry diagnosis codes are expected
/// to match [`Diagnosis::code`] but this is not enforced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Diagnosis {
    /// Unique code, e.g. `M24.2`.
    pub code: String,

    /// Human-readable name.
    pub name: String,

    /// Optional latin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}
