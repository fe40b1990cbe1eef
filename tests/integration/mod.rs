//! Integration tests for sqlexec.

pub mod console_test;
pub mod export_test;
pub mod highlight_test;
pub mod live_test;
pub mod pipeline_test;
