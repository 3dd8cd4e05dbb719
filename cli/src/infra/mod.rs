//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: algod and indexer HTTP
//! clients, transaction encoding and signing, and environment loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod algod;
pub mod algorand;
pub mod config;
pub mod http;
pub mod indexer;
pub mod transaction;
