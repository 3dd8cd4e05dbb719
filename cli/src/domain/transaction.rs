//! Network-independent description of the application calls a deploy sends.
//!
//! Fees, validity rounds and signatures are added by the infrastructure
//! layer when the calls are turned into wire transactions.

use deploy_common::AppSchema;

use crate::domain::account::Address;

/// What happens to the application when the call is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnComplete {
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

impl OnComplete {
    /// Protocol integer carried in the `apan` field.
    #[must_use]
    pub const fn code(self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
            Self::CloseOut => 2,
            Self::ClearState => 3,
            Self::UpdateApplication => 4,
            Self::DeleteApplication => 5,
        }
    }
}

/// One application call to be signed by the sender's registered key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCall {
    pub sender: Address,
    /// `0` creates a new application.
    pub app_id: u64,
    pub on_complete: OnComplete,
    pub approval_program: Option<Vec<u8>>,
    pub clear_program: Option<Vec<u8>>,
    /// Only meaningful on create.
    pub schema: Option<AppSchema>,
    pub note: Vec<u8>,
}

impl AppCall {
    /// Bare `NoOp` create of a new application.
    #[must_use]
    pub fn create(
        sender: Address,
        approval: Vec<u8>,
        clear: Vec<u8>,
        schema: AppSchema,
        note: Vec<u8>,
    ) -> Self {
        Self {
            sender,
            app_id: 0,
            on_complete: OnComplete::NoOp,
            approval_program: Some(approval),
            clear_program: Some(clear),
            schema: Some(schema),
            note,
        }
    }

    #[must_use]
    pub fn update(
        sender: Address,
        app_id: u64,
        approval: Vec<u8>,
        clear: Vec<u8>,
        note: Vec<u8>,
    ) -> Self {
        Self {
            sender,
            app_id,
            on_complete: OnComplete::UpdateApplication,
            approval_program: Some(approval),
            clear_program: Some(clear),
            schema: None,
            note,
        }
    }

    #[must_use]
    pub fn delete(sender: Address, app_id: u64) -> Self {
        Self {
            sender,
            app_id,
            on_complete: OnComplete::DeleteApplication,
            approval_program: None,
            clear_program: None,
            schema: None,
            note: Vec::new(),
        }
    }
}

/// Network parameters a transaction is built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedParams {
    /// Fee per byte in µAlgo; usually 0 outside congestion.
    pub fee_per_byte: u64,
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

/// A transaction that made it into a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_id: String,
    pub confirmed_round: u64,
    /// Set for application-create transactions.
    pub app_id: Option<u64>,
}
