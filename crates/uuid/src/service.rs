//! Internal implementation of identifier services.

use crate::{UuidError, UuidResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Opaque identifier of a patient or an entry.
///
/// Once constructed, the identifier is guaranteed to be non-empty and free of whitespace, so it
/// can be embedded in a URL path segment and compared byte-for-byte.
///
/// # Construction
/// - [`RecordId::parse`] validates an externally supplied identifier (fixture data, CLI input).
/// - [`IdGenerator::next_id`] allocates a fresh identifier for a new record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Validates and wraps an identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is empty or contains whitespace.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if input.is_empty() {
            return Err(UuidError::InvalidInput("identifier cannot be empty".into()));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(UuidError::InvalidInput(format!(
                "identifier must not contain whitespace, got: '{}'",
                input
            )));
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Source of fresh record identifiers.
///
/// Implementations must be safe to share between request handlers.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Allocates a new identifier.
    fn next_id(&self) -> RecordId;
}

/// Allocates random UUID v4 identifiers in hyphenated lowercase form.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> RecordId {
        RecordId(Uuid::new_v4().hyphenated().to_string())
    }
}

/// Allocates `<prefix>-<n>` identifiers from a monotonic counter starting at 1.
///
/// The counter is zero-padded to eight digits so identifiers sort in allocation order.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Creates a generator with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if the prefix would produce invalid identifiers.
    pub fn new(prefix: &str) -> UuidResult<Self> {
        RecordId::parse(prefix)?;
        Ok(Self {
            prefix: prefix.to_owned(),
            next: AtomicU64::new(1),
        })
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RecordId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId(format!("{}-{:08}", self.prefix, n))
    }
}
