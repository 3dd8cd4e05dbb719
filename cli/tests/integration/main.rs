//! Integration tests for bank-deploy
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Network services are stood in for by local wiremock servers.

mod cli_tests;
mod deploy_command;
