//! bank-deploy library — exposes modules for integration testing.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod application;
pub mod cli;
pub mod commands;
pub mod contracts;
pub mod domain;
pub mod infra;
pub mod output;
