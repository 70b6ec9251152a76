//! Ed25519 key strings in the ledger's textual form.
//!
//! Keys are rendered as hex-encoded DER, the same representation the SDK
//! prints: a fixed ASN.1 prefix followed by the 32 raw key bytes. Parsing
//! accepts either the DER form or the bare 32-byte hex.

use super::{LedgerError, LedgerResult};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

const PRIVATE_KEY_DER_PREFIX: &str = "302e020100300506032b657004220420";
const PUBLIC_KEY_DER_PREFIX: &str = "302a300506032b6570032100";

/// A freshly generated or parsed ed25519 key pair.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_private_key(key: &str) -> LedgerResult<Self> {
        Ok(Self {
            signing_key: parse_private_key(key)?,
        })
    }

    pub fn private_key(&self) -> String {
        encode_private_key(&self.signing_key)
    }

    pub fn public_key(&self) -> String {
        encode_public_key(&self.signing_key.verifying_key())
    }
}

pub fn encode_private_key(key: &SigningKey) -> String {
    format!("{}{}", PRIVATE_KEY_DER_PREFIX, hex::encode(key.to_bytes()))
}

pub fn encode_public_key(key: &VerifyingKey) -> String {
    format!("{}{}", PUBLIC_KEY_DER_PREFIX, hex::encode(key.as_bytes()))
}

pub fn parse_private_key(key: &str) -> LedgerResult<SigningKey> {
    let bytes = raw_key_bytes(key, PRIVATE_KEY_DER_PREFIX).ok_or_else(|| invalid("private key", key))?;
    Ok(SigningKey::from_bytes(&bytes))
}

/// Parse a public key, or derive it when handed a private key instead.
pub fn parse_public_key(key: &str) -> LedgerResult<VerifyingKey> {
    let trimmed = key.trim().to_ascii_lowercase();
    if trimmed.starts_with(PRIVATE_KEY_DER_PREFIX) {
        return Ok(parse_private_key(key)?.verifying_key());
    }

    let bytes = raw_key_bytes(key, PUBLIC_KEY_DER_PREFIX).ok_or_else(|| invalid("public key", key))?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| invalid("public key", key))
}

/// Canonical public key string for whatever key form was supplied.
pub fn normalize_public_key(key: &str) -> LedgerResult<String> {
    parse_public_key(key).map(|key| encode_public_key(&key))
}

fn raw_key_bytes(key: &str, der_prefix: &str) -> Option<[u8; 32]> {
    let key = key.trim().to_ascii_lowercase();
    let key = key.strip_prefix("0x").unwrap_or(&key);
    let body = key.strip_prefix(der_prefix).unwrap_or(key);
    let bytes = hex::decode(body).ok()?;
    bytes.try_into().ok()
}

fn invalid(what: &'static str, value: &str) -> LedgerError {
    LedgerError::InvalidInput {
        what,
        value: value.to_string(),
    }
}
