//! Joblog Core
//!
//! Core types shared by the joblog crates.
//!
//! This crate contains:
//! - Domain types: job and operator records, record validation
//! - DTOs: query and page shapes of the logs API

pub mod domain;
pub mod dto;
