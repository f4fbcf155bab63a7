//! Shared types and models for the Microgreen Grower Portal
//!
//! This crate contains the domain models shared between the backend services,
//! HTTP handlers, and tests. It is I/O free: everything here is plain data
//! plus validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
