//! The Bank application: per-account ALGO deposits with self-service withdrawals.

use deploy_common::{AppSpec, Arc56Error};

use crate::application::factory::AppDefinition;

/// ARC-56 specification produced by compiling the Bank contract.
pub const BANK_ARC56: &str = include_str!("../../artifacts/bank/Bank.arc56.json");

/// Marker type binding factories to the Bank app spec.
pub struct Bank;

impl AppDefinition for Bank {
    const NAME: &'static str = "Bank";

    fn app_spec() -> Result<AppSpec, Arc56Error> {
        AppSpec::from_json(BANK_ARC56)
    }
}
