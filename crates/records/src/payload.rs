//! Helpers for narrowing untyped JSON payloads.

use crate::{RecordsError, RecordsResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Returns the payload as a JSON object, or a validation error carrying `message`.
pub(crate) fn require_object<'a>(
    payload: &'a Value,
    message: &str,
) -> RecordsResult<&'a Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| RecordsError::Validation(message.to_owned()))
}

/// Fails with `message` unless every key in `keys` is present in `object`.
///
/// Presence only: a key mapped to `null` counts as present, and the value's type is checked
/// later by the typed deserialisation step.
pub(crate) fn require_keys(
    object: &Map<String, Value>,
    keys: &[&str],
    message: &str,
) -> RecordsResult<()> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RecordsError::Validation(format!(
            "{message} (missing: {})",
            missing.join(", ")
        )))
    }
}

/// Deserialises `value` into a wire struct, reporting the failing field path.
///
/// `subject` names what is being parsed ("entry", "patient") and `prefix` is the location of
/// `value` inside the whole payload ("" for the root).
pub(crate) fn deserialize<T: DeserializeOwned>(
    value: &Value,
    subject: &str,
    prefix: &str,
) -> RecordsResult<T> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let inner = if path.is_empty() || path == "." {
                None
            } else {
                Some(path)
            };
            let location = match (prefix.is_empty(), inner) {
                (true, None) => "<root>".to_owned(),
                (true, Some(inner)) => inner,
                (false, None) => prefix.to_owned(),
                (false, Some(inner)) => format!("{prefix}.{inner}"),
            };
            Err(RecordsError::Validation(format!(
                "invalid {subject} at {location}: {source}"
            )))
        }
    }
}

/// Short human-readable rendering of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    const MAX_LEN: usize = 40;

    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_LEN {
        rendered
    } else {
        let truncated: String = rendered.chars().take(MAX_LEN).collect();
        format!("{truncated}...")
    }
}
