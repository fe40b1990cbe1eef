//! Integration tests for sqlexec.
//!
//! Most tests run against a scripted transport. The live tests need a
//! running query service; set SQLEXEC_TEST_URL to run them.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
