//! Integration tests - full validation runs through the public API
//!
//! These tests exercise parsing, schema checking and type checking together,
//! the way a caller embedding the crate would.

mod schema_loading_tests;
mod type_checking_tests;
mod validation_pipeline_tests;

/// Installs the test logger; later calls are no-ops.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
