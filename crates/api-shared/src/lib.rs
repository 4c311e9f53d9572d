//! # API Shared
//!
//! Shared definitions for patientor API surfaces.
//!
//! Contains:
//! - `HealthService`, the liveness check behind `/api/ping`
//! - `ErrorRes`, the JSON error envelope returned on every failed request

pub mod error;
pub mod health;

pub use error::ErrorRes;
pub use health::HealthService;
