//! Integration test harness.

mod cli_tests;
mod engine_tests;
mod rule_tests;
