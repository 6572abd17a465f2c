//! Data Transfer Objects for the logs API
//!
//! Shapes exchanged between the log server and its clients.

pub mod log;
