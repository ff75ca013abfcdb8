//! # wellness
//!
//! Client library for the employee wellness backend: mood check-ins, check-in
//! history, support materials and surveys, behind a staff-only login.
//!
//! The crate is UI-framework agnostic. `session` owns authentication state,
//! `navigation` maps that state onto the screen tree, `services` wraps the
//! REST endpoints, and `state` holds the per-screen models a front end drives.

pub mod config;
pub mod navigation;
pub mod net;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ClientConfig;
pub use net::http::{ApiClient, ApiError};
pub use net::types::User;
pub use session::{Credentials, SessionError, SessionManager, SessionState, SessionStatus};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
