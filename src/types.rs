//! Request-scoped domain types shared by the HTTP layer and the ledger backends.
//!
//! Nothing here outlives a single request. The HTTP layer turns validated
//! request bodies into these commands; a [`Ledger`](crate::ledger::Ledger)
//! turns them into one transaction each and reports back a receipt summary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network profile a request is executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Resolve a network selector the permissive way.
    ///
    /// Only the exact string `"mainnet"` selects mainnet. Every other value,
    /// typos included, lands on testnet.
    pub fn select(name: &str) -> Self {
        if name == "mainnet" {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }

    /// Resolve a network selector, accepting only the two known names.
    pub fn parse_strict(name: &str) -> Option<Self> {
        match name {
            "mainnet" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account id + private key authorizing (and paying for) one transaction.
#[derive(Clone)]
pub struct Operator {
    pub account_id: String,
    pub private_key: String,
}

// Key material stays out of logs.
impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Token flavour selected at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenType {
    #[default]
    #[serde(alias = "FungibleUnique")]
    FungibleCommon,
    NonFungibleUnique,
}

/// NFT metadata or serial selector, accepted either as one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metadata {
    One(String),
    Many(Vec<String>),
}

impl Metadata {
    pub fn entries(&self) -> Vec<String> {
        match self {
            Metadata::One(entry) => vec![entry.clone()],
            Metadata::Many(entries) => entries.clone(),
        }
    }
}

/// The six optional role keys a token can carry, as key strings.
#[derive(Debug, Clone, Default)]
pub struct TokenKeys {
    pub admin: Option<String>,
    pub kyc: Option<String>,
    pub freeze: Option<String>,
    pub wipe: Option<String>,
    pub supply: Option<String>,
    pub fee_schedule: Option<String>,
    pub pause: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AccountCreate {
    /// Hbar moved from the operator into the new account; fractions allowed.
    pub initial_balance: f64,
}

#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub account_id: String,
    pub new_key: Option<String>,
    /// Seconds.
    pub auto_renew_period: Option<i64>,
    /// Unix seconds.
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TokenCreate {
    pub name: String,
    pub symbol: String,
    pub initial_supply: u64,
    pub decimals: Option<u32>,
    pub max_supply: Option<u64>,
    pub freeze_default: Option<bool>,
    pub keys: TokenKeys,
    pub auto_renew_account: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
    pub token_type: TokenType,
}

/// Mint or burn against a token's supply, signed by its supply key.
#[derive(Debug, Clone)]
pub struct SupplyChange {
    pub token_id: String,
    pub supply_key: String,
    pub amount: Option<u64>,
    /// NFT metadata when minting, NFT serials when burning.
    pub metadata: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TokenTransfer {
    pub token_id: String,
    pub to_account_id: String,
    pub amount: Option<u64>,
    /// NFT serials moved alongside (or instead of) the fungible amount.
    pub serials: Vec<String>,
}

/// Associate or dissociate `account_id` with a token, signed by that account's key.
#[derive(Debug, Clone)]
pub struct TokenAssociation {
    pub token_id: String,
    pub account_id: String,
    pub account_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUpdate {
    pub token_id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub keys: TokenKeys,
    pub auto_renew_account: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TokenDelete {
    pub token_id: String,
    pub admin_key: String,
}

/// Receipt summary for operations that assign nothing new.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct CreatedAccount {
    pub account_id: String,
    pub private_key: String,
    pub public_key: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone)]
pub struct CreatedToken {
    pub token_id: String,
    pub transaction_id: String,
}
