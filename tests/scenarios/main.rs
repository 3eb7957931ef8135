//! Scenario Tests
//!
//! Cross-crate tests that drive the model the way a differential-testing
//! harness does: through the database container, mixing timestamped and
//! transactional operations.

#[path = "../common/mod.rs"]
mod common;

mod examples;
mod isolation;
mod preconditions;
mod properties;
