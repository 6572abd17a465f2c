//! Core domain types
//!
//! This module contains the core domain structures used across joblog crates.
//! Records are written once at ingestion and only ever read afterwards.

pub mod job;
