//! Canonical msgpack encoding, grouping and signing of application calls.
//!
//! Algorand hashes and verifies the exact bytes of a transaction, so the
//! encoding must be canonical: map keys sorted, zero values omitted and byte
//! strings written as msgpack `bin`. Struct fields below are declared in key
//! order for that reason.

use anyhow::{Context, Result};
use data_encoding::BASE32_NOPAD;
use serde::Serialize;
use serde_bytes::ByteBuf;

use crate::domain::account::sha512_256;
use crate::domain::{AppCall, DeployerAccount, SuggestedParams};

/// Domain separator for transaction ids and signatures.
const TX_PREFIX: &[u8] = b"TX";
/// Domain separator for group ids.
const TX_GROUP_PREFIX: &[u8] = b"TG";
/// Upper bound on bytes a signature adds to the encoded transaction.
const SIGNATURE_OVERHEAD: usize = 75;
/// Upper bound on bytes an `sgnr` field adds for rekeyed senders.
const AUTH_ADDR_OVERHEAD: usize = 40;

fn is_zero(n: &u64) -> bool {
    *n == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct StateSchemaWire {
    #[serde(skip_serializing_if = "is_zero")]
    nbs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    nui: u64,
}

impl StateSchemaWire {
    fn new(ints: u64, bytes: u64) -> Option<Self> {
        (ints != 0 || bytes != 0).then_some(Self {
            nbs: bytes,
            nui: ints,
        })
    }
}

/// An `appl` transaction in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationCallTxn {
    #[serde(skip_serializing_if = "is_zero")]
    apan: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apap: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    apep: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apgs: Option<StateSchemaWire>,
    #[serde(skip_serializing_if = "is_zero")]
    apid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apls: Option<StateSchemaWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apsu: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    fee: u64,
    #[serde(skip_serializing_if = "is_zero")]
    fv: u64,
    #[serde(rename = "gen", skip_serializing_if = "String::is_empty")]
    genesis_id: String,
    gh: ByteBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    grp: Option<ByteBuf>,
    #[serde(skip_serializing_if = "is_zero")]
    lv: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<ByteBuf>,
    snd: ByteBuf,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct SignedTxn<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sgnr: Option<ByteBuf>,
    sig: ByteBuf,
    txn: &'a ApplicationCallTxn,
}

#[derive(Serialize)]
struct TxGroup {
    txlist: Vec<ByteBuf>,
}

fn non_empty(bytes: Option<&Vec<u8>>) -> Option<ByteBuf> {
    bytes
        .filter(|b| !b.is_empty())
        .map(|b| ByteBuf::from(b.clone()))
}

impl ApplicationCallTxn {
    /// Build the wire transaction for `call` and set its fee.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be encoded for size estimation.
    pub fn build(call: &AppCall, params: &SuggestedParams, rekeyed: bool) -> Result<Self> {
        let schema = call.schema.unwrap_or_default();
        let is_create = call.app_id == 0 && call.schema.is_some();
        let (global, local, extra_pages) = if is_create {
            (
                StateSchemaWire::new(schema.schema.global_ints, schema.schema.global_bytes),
                StateSchemaWire::new(schema.schema.local_ints, schema.schema.local_bytes),
                schema.extra_pages,
            )
        } else {
            (None, None, 0)
        };

        let mut txn = Self {
            apan: call.on_complete.code(),
            apap: non_empty(call.approval_program.as_ref()),
            apep: extra_pages,
            apgs: global,
            apid: call.app_id,
            apls: local,
            apsu: non_empty(call.clear_program.as_ref()),
            fee: 0,
            fv: params.first_valid,
            genesis_id: params.genesis_id.clone(),
            gh: ByteBuf::from(params.genesis_hash.to_vec()),
            grp: None,
            lv: params.last_valid,
            note: non_empty(Some(&call.note)),
            snd: ByteBuf::from(call.sender.public_key().to_vec()),
            kind: "appl",
        };
        txn.fee = txn.required_fee(params, rekeyed)?;
        Ok(txn)
    }

    fn required_fee(&self, params: &SuggestedParams, rekeyed: bool) -> Result<u64> {
        let mut size = self.encode()?.len() + SIGNATURE_OVERHEAD;
        if rekeyed {
            size += AUTH_ADDR_OVERHEAD;
        }
        let by_size = params
            .fee_per_byte
            .saturating_mul(u64::try_from(size).unwrap_or(u64::MAX));
        Ok(by_size.max(params.min_fee))
    }

    #[must_use]
    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// Canonical msgpack bytes of the unsigned transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if msgpack serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).context("encoding transaction")
    }

    fn bytes_to_sign(&self) -> Result<Vec<u8>> {
        let mut out = TX_PREFIX.to_vec();
        out.extend(self.encode()?);
        Ok(out)
    }

    /// Raw 32-byte transaction id.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be encoded.
    pub fn raw_id(&self) -> Result<[u8; 32]> {
        Ok(sha512_256(&[&self.bytes_to_sign()?]))
    }

    /// Transaction id as shown by explorers and returned by algod.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be encoded.
    pub fn id(&self) -> Result<String> {
        Ok(BASE32_NOPAD.encode(&self.raw_id()?))
    }

    /// Sign with `account`, returning the encoded signed transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be encoded.
    pub fn sign(&self, account: &DeployerAccount) -> Result<Vec<u8>> {
        let sig = account.sign(&self.bytes_to_sign()?);
        let sgnr = account
            .is_rekeyed()
            .then(|| ByteBuf::from(account.signer_address().public_key().to_vec()));
        let signed = SignedTxn {
            sgnr,
            sig: ByteBuf::from(sig.to_vec()),
            txn: self,
        };
        rmp_serde::to_vec_named(&signed).context("encoding signed transaction")
    }
}

/// Stamp every transaction with the id of the group they form.
///
/// A single transaction is left ungrouped.
///
/// # Errors
///
/// Returns an error if any transaction cannot be encoded.
pub fn assign_group(txns: &mut [ApplicationCallTxn]) -> Result<()> {
    if txns.len() < 2 {
        return Ok(());
    }
    let txlist = txns
        .iter()
        .map(|t| t.raw_id().map(|id| ByteBuf::from(id.to_vec())))
        .collect::<Result<Vec<_>>>()?;
    let encoded = rmp_serde::to_vec_named(&TxGroup { txlist }).context("encoding group")?;
    let group_id = sha512_256(&[TX_GROUP_PREFIX, &encoded]);
    for txn in txns.iter_mut() {
        txn.grp = Some(ByteBuf::from(group_id.to_vec()));
    }
    Ok(())
}
