//! Integration tests for streamwhere
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests
//! - availability_test: provider dedup, selection, and country resolution
//! - cli_test: argument parsing, JSON envelope, exit codes
//! - e2e_test: End-to-end flow tests (Search -> Details -> Availability)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
