//! Thin wrappers over the domain endpoints.
//!
//! ARCHITECTURE
//! ============
//! Each function issues one request through the shared [`ApiClient`],
//! logs failures with `tracing::error!` and hands the error back unchanged.
//! None of them holds state; authentication rides on the client's default
//! header, which only the session manager sets.
//!
//! [`ApiClient`]: crate::net::http::ApiClient

pub mod checkin;
pub mod materials;
pub mod surveys;
