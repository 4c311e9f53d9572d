//! Patient storage.
//!
//! Services talk to storage through [`PatientRepository`] so the in-memory store used today can
//! be swapped for a persistent one without touching request handling.

pub mod patients;

pub use patients::{InMemoryPatientRepository, PatientRepository};
