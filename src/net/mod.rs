//! Networking modules for the wellness REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the shared `reqwest` client and its default auth header, and
//! `types` defines the wire schema plus the boundary normalization of
//! ambiguous response shapes.

pub mod http;
pub mod types;
