//! Application definitions shipped with the deployer.

pub mod bank;

pub use bank::Bank;
