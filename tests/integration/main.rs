//! Integration tests for the hauler client and command line.
//!
//! Every test runs against a local `wiremock` server; no network access or
//! OS keychain is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # Run a specific test
//! cargo test --test integration test_list_projects_included_buyer -- --nocapture
//! ```

mod common;
mod credential_tests;
mod pipeline_tests;
