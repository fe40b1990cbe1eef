//! sqlexec - SQL console core for a remote query service.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod app;
pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod highlight;
pub mod logging;
pub mod query;
pub mod results;
