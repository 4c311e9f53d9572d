//! Medical entry models and the entry payload parser.
//!
//! An [`Entry`] is a dated medical record attached to a patient. Every entry carries the same
//! base fields (`id`, `description`, `date`, `specialist`, optional `diagnosisCodes`) plus the
//! fields of exactly one kind, selected by the `type` tag:
//!
//! | `type` | Extra fields |
//! |---|---|
//! | `Hospital` | `discharge { date, criteria }` |
//! | `OccupationalHealthcare` | `employerName`, optional `sickLeave { startDate, endDate }` |
//! | `HealthCheck` | `healthCheckRating` (0 to 3) |
//!
//! [`NewEntry::parse`] narrows an untyped payload to one of these shapes. It checks, in order:
//! the payload is an object carrying the four base keys, the `type` tag names a known kind, the
//! kind-specific fields are well formed, and finally the base fields themselves.
//!
//! Diagnosis codes are taken as given. They are not checked against the diagnosis reference
//! list.

use crate::payload::{describe, deserialize, require_keys, require_object};
use crate::{RecordsError, RecordsResult};
use patientor_types::NonEmptyText;
use patientor_uuid::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

// ============================================================================
// Public domain-level types
// ============================================================================

/// A stored medical entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Entry {
    #[schema(value_type = String)]
    pub id: RecordId,

    pub description: String,

    pub date: String,

    pub specialist: String,

    #[serde(
        rename = "diagnosisCodes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub diagnosis_codes: Option<Vec<String>>,

    #[serde(flatten)]
    pub details: EntryDetails,
}

/// Kind-specific part of an entry, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum EntryDetails {
    Hospital {
        discharge: Discharge,
    },
    OccupationalHealthcare {
        #[serde(rename = "employerName")]
        employer_name: String,

        #[serde(
            rename = "sickLeave",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        sick_leave: Option<SickLeave>,
    },
    HealthCheck {
        #[serde(rename = "healthCheckRating")]
        #[schema(value_type = u8)]
        health_check_rating: HealthCheckRating,
    },
}

impl EntryDetails {
    /// The `type` tag of this kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryDetails::Hospital { .. } => "Hospital",
            EntryDetails::OccupationalHealthcare { .. } => "OccupationalHealthcare",
            EntryDetails::HealthCheck { .. } => "HealthCheck",
        }
    }
}

impl Entry {
    /// The `type` tag of this entry.
    pub fn kind(&self) -> &'static str {
        self.details.kind()
    }
}

/// Hospital discharge record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

/// Sick-leave interval granted during an occupational healthcare visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SickLeave {
    #[serde(rename = "startDate")]
    pub start_date: String,

    #[serde(rename = "endDate")]
    pub end_date: String,
}

/// Outcome of a health check, serialised as the integers 0 to 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    /// Maps an integer to a rating; anything outside 0 to 3 is rejected.
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            0 => Some(HealthCheckRating::Healthy),
            1 => Some(HealthCheckRating::LowRisk),
            2 => Some(HealthCheckRating::HighRisk),
            3 => Some(HealthCheckRating::CriticalRisk),
            _ => None,
        }
    }

    /// Wire value of the rating, 0 to 3.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Display label, e.g. `LowRisk`.
    pub fn label(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "LowRisk",
            HealthCheckRating::HighRisk => "HighRisk",
            HealthCheckRating::CriticalRisk => "CriticalRisk",
        }
    }
}

impl serde::Serialize for HealthCheckRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> serde::Deserialize<'de> for HealthCheckRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        HealthCheckRating::from_u64(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "health check rating must be 0, 1, 2 or 3, got {value}"
            ))
        })
    }
}

/// How a malformed `sickLeave` object is handled.
///
/// A `sickLeave` that is absent or `null` is always accepted as "no sick leave", and one with
/// both `startDate` and `endDate` is always parsed strictly. The policy only decides what
/// happens to anything else (a non-object, or an object missing either date).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SickLeavePolicy {
    /// Drop the malformed value and store the entry without sick leave.
    #[default]
    Lenient,
    /// Reject the entry.
    Strict,
}

impl SickLeavePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SickLeavePolicy::Lenient => "lenient",
            SickLeavePolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for SickLeavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SickLeavePolicy {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(SickLeavePolicy::Lenient),
            "strict" => Ok(SickLeavePolicy::Strict),
            other => Err(RecordsError::InvalidInput(format!(
                "unknown sick leave policy '{other}' (expected 'lenient' or 'strict')"
            ))),
        }
    }
}

/// A validated entry submission, not yet assigned an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub description: String,
    pub date: String,
    pub specialist: String,
    pub diagnosis_codes: Option<Vec<String>>,
    pub details: EntryDetails,
}

const BASE_FIELDS_MESSAGE: &str = "one or more entry fields missing or incorrect";
const BASE_FIELDS: [&str; 4] = ["type", "description", "date", "specialist"];

impl NewEntry {
    /// Parse an entry submission payload.
    ///
    /// # Arguments
    ///
    /// * `payload` - Untyped request body.
    /// * `sick_leave_policy` - Treatment of malformed `sickLeave` values.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::Validation`] if:
    /// - the payload is not an object or lacks any of `type`, `description`, `date`,
    ///   `specialist`,
    /// - `type` is not `Hospital`, `OccupationalHealthcare` or `HealthCheck`,
    /// - a kind-specific field is missing or malformed,
    /// - any string field is not a non-empty string,
    /// - `diagnosisCodes` is present but not an array of strings.
    pub fn parse(payload: &Value, sick_leave_policy: SickLeavePolicy) -> RecordsResult<Self> {
        let object = require_object(payload, BASE_FIELDS_MESSAGE)?;
        require_keys(object, &BASE_FIELDS, BASE_FIELDS_MESSAGE)?;

        let details = match object.get("type") {
            Some(Value::String(kind)) if kind == "Hospital" => parse_hospital(payload)?,
            Some(Value::String(kind)) if kind == "OccupationalHealthcare" => {
                parse_occupational_healthcare(payload, object, sick_leave_policy)?
            }
            Some(Value::String(kind)) if kind == "HealthCheck" => parse_health_check(object)?,
            other => {
                let found = other.map(describe).unwrap_or_else(|| "nothing".into());
                return Err(RecordsError::Validation(format!(
                    "wrong entry type: {found}"
                )));
            }
        };

        let base: BaseEntryWire = deserialize(payload, "entry", "")?;
        Ok(Self {
            description: base.description.into_inner(),
            date: base.date.into_inner(),
            specialist: base.specialist.into_inner(),
            diagnosis_codes: base.diagnosis_codes,
            details,
        })
    }

    /// Builds the stored entry with the given identifier.
    pub fn into_entry(self, id: RecordId) -> Entry {
        Entry {
            id,
            description: self.description,
            date: self.date,
            specialist: self.specialist,
            diagnosis_codes: self.diagnosis_codes,
            details: self.details,
        }
    }
}

// ============================================================================
// Variant parsers (internal)
// ============================================================================

fn parse_hospital(payload: &Value) -> RecordsResult<EntryDetails> {
    let wire: HospitalWire = deserialize(payload, "entry", "")?;
    Ok(EntryDetails::Hospital {
        discharge: Discharge {
            date: wire.discharge.date.into_inner(),
            criteria: wire.discharge.criteria.into_inner(),
        },
    })
}

fn parse_occupational_healthcare(
    payload: &Value,
    object: &Map<String, Value>,
    policy: SickLeavePolicy,
) -> RecordsResult<EntryDetails> {
    let wire: OccupationalHealthcareWire = deserialize(payload, "entry", "")?;
    let sick_leave = parse_sick_leave(object.get("sickLeave"), policy)?;

    Ok(EntryDetails::OccupationalHealthcare {
        employer_name: wire.employer_name.into_inner(),
        sick_leave,
    })
}

fn parse_sick_leave(
    value: Option<&Value>,
    policy: SickLeavePolicy,
) -> RecordsResult<Option<SickLeave>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(fields))
            if fields.contains_key("startDate") && fields.contains_key("endDate") =>
        {
            let wire: SickLeaveWire = deserialize(value, "entry", "sickLeave")?;
            Ok(Some(SickLeave {
                start_date: wire.start_date.into_inner(),
                end_date: wire.end_date.into_inner(),
            }))
        }
        Some(other) => match policy {
            SickLeavePolicy::Lenient => {
                tracing::warn!("ignoring malformed sickLeave: {}", describe(other));
                Ok(None)
            }
            SickLeavePolicy::Strict => Err(RecordsError::Validation(format!(
                "invalid entry at sickLeave: expected an object with startDate and endDate, got {}",
                describe(other)
            ))),
        },
    }
}

fn parse_health_check(object: &Map<String, Value>) -> RecordsResult<EntryDetails> {
    let value = object.get("healthCheckRating").ok_or_else(|| {
        RecordsError::Validation("invalid entry at <root>: missing field `healthCheckRating`".into())
    })?;

    // `as_u64` is `None` for negatives, fractions, strings, booleans and null.
    let rating = value
        .as_u64()
        .and_then(HealthCheckRating::from_u64)
        .ok_or_else(|| {
            RecordsError::Validation(format!(
                "invalid entry at healthCheckRating: expected 0, 1, 2 or 3, got {}",
                describe(value)
            ))
        })?;

    Ok(EntryDetails::HealthCheck {
        health_check_rating: rating,
    })
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Base fields shared by every kind. Other keys are ignored.
#[derive(Deserialize)]
struct BaseEntryWire {
    description: NonEmptyText,
    date: NonEmptyText,
    specialist: NonEmptyText,
    #[serde(rename = "diagnosisCodes", default)]
    diagnosis_codes: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct HospitalWire {
    discharge: DischargeWire,
}

#[derive(Deserialize)]
struct DischargeWire {
    date: NonEmptyText,
    criteria: NonEmptyText,
}

#[derive(Deserialize)]
struct OccupationalHealthcareWire {
    #[serde(rename = "employerName")]
    employer_name: NonEmptyText,
}

#[derive(Deserialize)]
struct SickLeaveWire {
    #[serde(rename = "startDate")]
    start_date: NonEmptyText,
    #[serde(rename = "endDate")]
    end_date: NonEmptyText,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation_message(err: RecordsError) -> String {
        match err {
            RecordsError::Validation(msg) => msg,
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    fn parse(payload: &Value) -> RecordsResult<NewEntry> {
        NewEntry::parse(payload, SickLeavePolicy::Lenient)
    }

    fn hospital() -> Value {
        json!({
            "type": "Hospital",
            "description": "Healing time appr. 2 weeks.",
            "date": "2015-01-02",
            "specialist": "MD House",
            "diagnosisCodes": ["S62.5"],
            "discharge": {"date": "2015-01-16", "criteria": "Thumb has healed."}
        })
    }

    fn occupational() -> Value {
        json!({
            "type": "OccupationalHealthcare",
            "description": "Minor radiation poisoning.",
            "date": "2019-08-05",
            "specialist": "MD House",
            "employerName": "HyPD",
            "sickLeave": {"startDate": "2019-08-05", "endDate": "2019-08-28"}
        })
    }

    fn health_check(rating: Value) -> Value {
        json!({
            "type": "HealthCheck",
            "description": "Annual",
            "date": "2023-01-01",
            "specialist": "Dr. X",
            "healthCheckRating": rating
        })
    }

    #[test]
    fn parses_hospital_entry() {
        let entry = parse(&hospital())
            .expect("valid hospital entry")
            .into_entry(RecordId::parse("e-1").unwrap());

        assert_eq!(entry.id, "e-1");
        assert_eq!(entry.description, "Healing time appr. 2 weeks.");
        assert_eq!(entry.date, "2015-01-02");
        assert_eq!(entry.specialist, "MD House");
        assert_eq!(entry.diagnosis_codes, Some(vec!["S62.5".to_string()]));
        assert_eq!(
            entry.details,
            EntryDetails::Hospital {
                discharge: Discharge {
                    date: "2015-01-16".into(),
                    criteria: "Thumb has healed.".into(),
                }
            }
        );
    }

    #[test]
    fn parses_occupational_entry_with_sick_leave() {
        let entry = parse(&occupational()).expect("valid occupational entry");
        assert_eq!(
            entry.details,
            EntryDetails::OccupationalHealthcare {
                employer_name: "HyPD".into(),
                sick_leave: Some(SickLeave {
                    start_date: "2019-08-05".into(),
                    end_date: "2019-08-28".into(),
                }),
            }
        );
        assert_eq!(entry.diagnosis_codes, None);
    }

    #[test]
    fn parses_every_valid_health_check_rating() {
        for (raw, expected) in [
            (0, HealthCheckRating::Healthy),
            (1, HealthCheckRating::LowRisk),
            (2, HealthCheckRating::HighRisk),
            (3, HealthCheckRating::CriticalRisk),
        ] {
            let entry = parse(&health_check(json!(raw))).expect("valid rating");
            assert_eq!(
                entry.details,
                EntryDetails::HealthCheck {
                    health_check_rating: expected
                }
            );
        }
    }

    #[test]
    fn rejects_invalid_health_check_ratings() {
        for raw in [
            json!(4),
            json!(-1),
            json!(5),
            json!("2"),
            json!(true),
            json!(1.5),
            json!(2.0),
            json!(null),
            json!([1]),
        ] {
            let msg = validation_message(parse(&health_check(raw.clone())).unwrap_err());
            assert!(msg.contains("healthCheckRating"), "{raw}: {msg}");
        }
    }

    #[test]
    fn rejects_missing_health_check_rating() {
        let mut payload = health_check(json!(1));
        payload.as_object_mut().unwrap().remove("healthCheckRating");

        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("healthCheckRating"), "{msg}");
    }

    #[test]
    fn rejects_missing_base_fields() {
        for field in BASE_FIELDS {
            let mut payload = hospital();
            payload.as_object_mut().unwrap().remove(field);

            let msg = validation_message(parse(&payload).unwrap_err());
            assert!(msg.starts_with(BASE_FIELDS_MESSAGE), "{field}: {msg}");
            assert!(msg.contains(field), "{field}: {msg}");
        }
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [json!(null), json!("Hospital"), json!([hospital()]), json!(1)] {
            let msg = validation_message(parse(&payload).unwrap_err());
            assert_eq!(msg, BASE_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let mut payload = hospital();
        payload["type"] = json!("Dental");
        let msg = validation_message(parse(&payload).unwrap_err());
        assert_eq!(msg, "wrong entry type: \"Dental\"");

        payload["type"] = json!(3);
        let msg = validation_message(parse(&payload).unwrap_err());
        assert_eq!(msg, "wrong entry type: 3");
    }

    #[test]
    fn rejects_non_string_base_fields() {
        for field in ["description", "date", "specialist"] {
            for bad in [json!(12), json!({"text": "x"}), json!(null), json!("")] {
                let mut payload = health_check(json!(0));
                payload[field] = bad.clone();

                let msg = validation_message(parse(&payload).unwrap_err());
                assert!(msg.contains(field), "{field}={bad}: {msg}");
            }
        }
    }

    #[test]
    fn accepts_whitespace_only_text_verbatim() {
        let mut payload = health_check(json!(2));
        payload["description"] = json!("   ");

        let entry = parse(&payload).expect("blank text is still a string");
        assert_eq!(entry.description, "   ");
    }

    #[test]
    fn rejects_malformed_discharge() {
        let mut payload = hospital();
        payload.as_object_mut().unwrap().remove("discharge");
        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("discharge"), "{msg}");

        let mut payload = hospital();
        payload["discharge"] = json!({"date": "2015-01-16"});
        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("criteria"), "{msg}");

        let mut payload = hospital();
        payload["discharge"] = json!({"date": "2015-01-16", "criteria": 7});
        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("discharge.criteria"), "{msg}");

        let mut payload = hospital();
        payload["discharge"] = json!("yesterday");
        assert!(parse(&payload).is_err());
    }

    #[test]
    fn rejects_missing_employer_name() {
        let mut payload = occupational();
        payload.as_object_mut().unwrap().remove("employerName");
        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("employerName"), "{msg}");
    }

    #[test]
    fn lenient_policy_drops_malformed_sick_leave() {
        for bad in [json!({"startDate": "2019-08-05"}), json!("two weeks"), json!(14)] {
            let mut payload = occupational();
            payload["sickLeave"] = bad;

            let entry = parse(&payload).expect("lenient policy accepts entry");
            assert_eq!(
                entry.details,
                EntryDetails::OccupationalHealthcare {
                    employer_name: "HyPD".into(),
                    sick_leave: None,
                }
            );
        }
    }

    #[test]
    fn strict_policy_rejects_malformed_sick_leave() {
        let mut payload = occupational();
        payload["sickLeave"] = json!({"startDate": "2019-08-05"});

        let msg = validation_message(
            NewEntry::parse(&payload, SickLeavePolicy::Strict).unwrap_err(),
        );
        assert!(msg.contains("sickLeave"), "{msg}");
    }

    #[test]
    fn both_policies_accept_absent_or_null_sick_leave() {
        for policy in [SickLeavePolicy::Lenient, SickLeavePolicy::Strict] {
            let mut payload = occupational();
            payload.as_object_mut().unwrap().remove("sickLeave");
            assert!(NewEntry::parse(&payload, policy).is_ok());

            payload["sickLeave"] = json!(null);
            assert!(NewEntry::parse(&payload, policy).is_ok());
        }
    }

    #[test]
    fn both_policies_reject_non_string_sick_leave_dates() {
        for policy in [SickLeavePolicy::Lenient, SickLeavePolicy::Strict] {
            let mut payload = occupational();
            payload["sickLeave"] = json!({"startDate": 20190805, "endDate": "2019-08-28"});

            let msg = validation_message(NewEntry::parse(&payload, policy).unwrap_err());
            assert!(msg.contains("sickLeave.startDate"), "{msg}");
        }
    }

    #[test]
    fn accepts_unknown_diagnosis_codes() {
        let mut payload = health_check(json!(1));
        payload["diagnosisCodes"] = json!(["NOT-A-CODE"]);

        let entry = parse(&payload).expect("codes are not checked against reference data");
        assert_eq!(entry.diagnosis_codes, Some(vec!["NOT-A-CODE".to_string()]));
    }

    #[test]
    fn rejects_diagnosis_codes_that_are_not_string_arrays() {
        let mut payload = health_check(json!(1));
        payload["diagnosisCodes"] = json!("S62.5");
        let msg = validation_message(parse(&payload).unwrap_err());
        assert!(msg.contains("diagnosisCodes"), "{msg}");

        payload["diagnosisCodes"] = json!(null);
        assert_eq!(parse(&payload).unwrap().diagnosis_codes, None);
    }

    #[test]
    fn drops_fields_of_other_kinds() {
        let mut payload = health_check(json!(2));
        payload["employerName"] = json!("FBI");
        payload["discharge"] = json!({"date": "2015-01-16", "criteria": "ok"});

        let entry = parse(&payload)
            .unwrap()
            .into_entry(RecordId::parse("e-2").unwrap());
        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("employerName").is_none());
        assert!(json.get("discharge").is_none());
        assert_eq!(json["type"], "HealthCheck");
        assert_eq!(json["healthCheckRating"], 2);
    }

    #[test]
    fn serialises_with_type_tag_and_camel_case_fields() {
        let entry = parse(&occupational())
            .unwrap()
            .into_entry(RecordId::parse("e-3").unwrap());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "e-3",
                "type": "OccupationalHealthcare",
                "description": "Minor radiation poisoning.",
                "date": "2019-08-05",
                "specialist": "MD House",
                "employerName": "HyPD",
                "sickLeave": {"startDate": "2019-08-05", "endDate": "2019-08-28"}
            })
        );

        let back: Entry = serde_json::from_value(json).expect("stored entry deserialises");
        assert_eq!(back, entry);
    }

    #[test]
    fn sick_leave_policy_parses_case_insensitively() {
        assert_eq!("Strict".parse::<SickLeavePolicy>().unwrap(), SickLeavePolicy::Strict);
        assert_eq!(" lenient ".parse::<SickLeavePolicy>().unwrap(), SickLeavePolicy::Lenient);
        assert!(matches!(
            "loose".parse::<SickLeavePolicy>(),
            Err(RecordsError::InvalidInput(_))
        ));
    }
}
