//! Algorand addresses, mnemonics and the deployer signing account.
//!
//! Pure functions only — no I/O, no async.

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use ed25519_dalek::{Signer as _, SigningKey};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha512_256};

use crate::domain::error::AccountError;

// ── Constants ────────────────────────────────────────────────────────────────

const PUBLIC_KEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;
const ADDRESS_LEN: usize = 58;
const MNEMONIC_WORDS: usize = 25;
const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = 0x7ff;

/// Domain separator hashed with an app id to derive the app's escrow address.
const APP_ID_PREFIX: &[u8] = b"appID";

/// SHA-512/256, the digest used throughout the Algorand protocol.
#[must_use]
pub fn sha512_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

// ── Address ──────────────────────────────────────────────────────────────────

/// A 32-byte Algorand public key, displayed in its checksummed base32 form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; PUBLIC_KEY_LEN]);

impl Address {
    #[must_use]
    pub const fn from_public_key(key: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(key)
    }

    #[must_use]
    pub const fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Escrow address of an application.
    #[must_use]
    pub fn for_application(app_id: u64) -> Self {
        Self(sha512_256(&[APP_ID_PREFIX, &app_id.to_be_bytes()]))
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        let digest = sha512_256(&[&self.0]);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[PUBLIC_KEY_LEN - CHECKSUM_LEN..]);
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = Vec::with_capacity(PUBLIC_KEY_LEN + CHECKSUM_LEN);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&raw))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LEN {
            return Err(AccountError::AddressLength(s.len()));
        }
        let raw = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|_| AccountError::AddressEncoding)?;
        if raw.len() != PUBLIC_KEY_LEN + CHECKSUM_LEN {
            return Err(AccountError::AddressEncoding);
        }
        let mut key = [0u8; PUBLIC_KEY_LEN];
        key.copy_from_slice(&raw[..PUBLIC_KEY_LEN]);
        let address = Self(key);
        if address.checksum()[..] != raw[PUBLIC_KEY_LEN..] {
            return Err(AccountError::AddressChecksum);
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Mnemonic ─────────────────────────────────────────────────────────────────

/// Pack bytes into little-endian 11-bit groups.
fn to_u11(bytes: &[u8]) -> Vec<u32> {
    let mut out = Vec::with_capacity(bytes.len() * 8 / 11 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in bytes {
        buffer |= u32::from(byte) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push(buffer & WORD_MASK);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push(buffer & WORD_MASK);
    }
    out
}

/// Inverse of [`to_u11`]; may yield one trailing padding byte.
fn from_u11(groups: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * 11 / 8 + 1);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &group in groups {
        buffer |= group << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}

fn word_list() -> &'static [&'static str; 2048] {
    bip39::Language::English.word_list()
}

fn checksum_word(seed: &[u8; 32]) -> &'static str {
    let digest = sha512_256(&[seed]);
    let index = to_u11(&digest[..2])[0];
    word_list()[index as usize]
}

/// Encode a 32-byte ed25519 seed as a 25-word mnemonic.
#[must_use]
pub fn mnemonic_from_seed(seed: &[u8; 32]) -> String {
    let words = word_list();
    let mut out: Vec<&str> = to_u11(seed).into_iter().map(|i| words[i as usize]).collect();
    out.push(checksum_word(seed));
    out.join(" ")
}

/// Decode a 25-word mnemonic back to its 32-byte ed25519 seed.
pub fn seed_from_mnemonic(mnemonic: &str) -> Result<[u8; 32], AccountError> {
    let words: Vec<String> = mnemonic
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if words.len() != MNEMONIC_WORDS {
        return Err(AccountError::MnemonicLength(words.len()));
    }

    let list = word_list();
    let mut groups = Vec::with_capacity(MNEMONIC_WORDS - 1);
    for word in &words[..MNEMONIC_WORDS - 1] {
        let index = list
            .iter()
            .position(|w| w == word)
            .ok_or_else(|| AccountError::UnknownWord(word.clone()))?;
        groups.push(u32::try_from(index).map_err(|_| AccountError::UnknownWord(word.clone()))?);
    }

    // 24 × 11 bits = 264 bits = 32 seed bytes + one zero padding byte.
    let bytes = from_u11(&groups);
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(AccountError::MnemonicChecksum);
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);

    if checksum_word(&seed) != words[MNEMONIC_WORDS - 1] {
        return Err(AccountError::MnemonicChecksum);
    }
    Ok(seed)
}

// ── Deployer account ─────────────────────────────────────────────────────────

/// The identity that authors deploy transactions.
///
/// `sender` equals the key's own address unless the account was rekeyed, in
/// which case the key authorises transactions sent from `sender`.
#[derive(Clone)]
pub struct DeployerAccount {
    key: SigningKey,
    sender: Address,
}

impl DeployerAccount {
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&seed);
        let sender = Address::from_public_key(key.verifying_key().to_bytes());
        Self { key, sender }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, AccountError> {
        seed_from_mnemonic(mnemonic).map(Self::from_seed)
    }

    /// Send from `sender` while signing with this key (rekeyed account).
    #[must_use]
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Address transactions are sent from.
    #[must_use]
    pub fn address(&self) -> Address {
        self.sender
    }

    /// Address of the signing key itself.
    #[must_use]
    pub fn signer_address(&self) -> Address {
        Address::from_public_key(self.key.verifying_key().to_bytes())
    }

    #[must_use]
    pub fn is_rekeyed(&self) -> bool {
        self.sender != self.signer_address()
    }

    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.key.sign(message).to_bytes()
    }

    #[must_use]
    pub fn to_mnemonic(&self) -> String {
        mnemonic_from_seed(&self.key.to_bytes())
    }
}

impl fmt::Debug for DeployerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployerAccount")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}
