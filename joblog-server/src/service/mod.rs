//! Service Module
//!
//! Business logic layer for the log server.
//! Services sit between the HTTP API and the record store.

pub mod log;

// Re-export for convenience
pub use log as log_service;
