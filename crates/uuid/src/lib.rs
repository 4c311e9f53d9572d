//! Record identifiers and identifier generation.
//!
//! Patients and entries are keyed by opaque string identifiers. Seeded records arrive with
//! whatever identifiers the fixture data carries (historically hyphenated UUIDs), while new
//! records are allocated by an [`IdGenerator`].
//!
//! This module provides:
//! - [`RecordId`], a wrapper that guarantees a non-empty identifier without whitespace once
//!   constructed.
//! - [`IdGenerator`], the seam used by services to allocate identifiers, with two
//!   implementations:
//!   - [`RandomIdGenerator`]: random UUID v4 in hyphenated lowercase form, e.g.
//!     `550e8400-e29b-41d4-a716-446655440000`. This is the default for running servers.
//!   - [`SequentialIdGenerator`]: a monotonic counter with a prefix, e.g. `entry-00000001`.
//!     Useful when output must be reproducible.
//!
//! ## Uniqueness
//!
//! Random identifiers are not checked against existing records; the collision probability of
//! 122 random bits is negligible. Sequential identifiers are unique per generator instance.

mod service;

// Re-export public types
pub use service::{IdGenerator, RandomIdGenerator, RecordId, SequentialIdGenerator, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
