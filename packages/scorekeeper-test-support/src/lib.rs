//! Test support shared by the scorekeeper unit and integration tests.
//!
//! Provides the unified test logging initialization and helpers for
//! generating unique, isolated test data.

pub mod logging;
pub mod unique_helpers;
