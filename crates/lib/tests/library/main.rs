//! Integration tests for strata-lib: build files on disk through to the action graph.

mod common;
mod properties_tests;
mod scenarios_tests;
