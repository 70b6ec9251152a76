use crate::{error::ApiError, Network, Operator};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A named request field, as reported in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// JSON name, also the prefix of the error code.
    pub name: &'static str,
    /// Human-readable name used in the error message.
    pub label: &'static str,
}

impl Field {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }

    pub fn error_code(&self) -> String {
        format!("{}-error", self.name)
    }
}

/// Every field a handler may require.
pub mod fields {
    use super::Field;

    pub const NETWORK: Field = Field::new("network", "Network");
    pub const ACCOUNT_ID: Field = Field::new("accountId", "Account ID");
    pub const USER_PRIVATE_KEY: Field = Field::new("userPrivateKey", "User Private Key");
    pub const INITIAL_BALANCE: Field = Field::new("initialBalance", "Initial Balance");
    pub const TOKEN_NAME: Field = Field::new("tokenName", "Token Name");
    pub const TOKEN_SYMBOL: Field = Field::new("tokenSymbol", "Token Symbol");
    pub const INITIAL_SUPPLY: Field = Field::new("initialSupply", "Initial Supply");
    pub const TOKEN_ID: Field = Field::new("tokenId", "Token ID");
    pub const SUPPLY_KEY: Field = Field::new("supplyKey", "Supply Key");
    pub const TO_ACCOUNT_ID: Field = Field::new("toAccountId", "Recipient Account ID");
    pub const ACCOUNT_ID_TO_ASSOCIATE: Field =
        Field::new("accountIdToAssociate", "Account ID to associate");
    pub const ASSOCIATE_KEY: Field = Field::new("associateKey", "Associate Key");
    pub const ACCOUNT_ID_TO_DISSOCIATE: Field =
        Field::new("accountIdToDissociate", "Account ID to dissociate");
    pub const DISSOCIATE_KEY: Field = Field::new("dissociateKey", "Dissociate Key");
    pub const ADMIN_KEY: Field = Field::new("adminKey", "Admin Key");
}

/// JSON truthiness: empty strings, zero and `false` count as absent.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for u64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for u32 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for i64 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Presence for f64 {
    fn is_present(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl Presence for crate::Metadata {
    fn is_present(&self) -> bool {
        match self {
            crate::Metadata::One(entry) => !entry.is_empty(),
            crate::Metadata::Many(_) => true,
        }
    }
}

impl Presence for Value {
    fn is_present(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().is_some_and(|n| n.is_present()),
            Value::String(text) => text.is_present(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// Check `required` fields of a raw JSON object for presence, in order.
///
/// Runs before the object is read into a typed body, so a missing field is
/// reported ahead of a mistyped one.
pub fn check_present(object: &Map<String, Value>, required: &[Field]) -> Result<(), ApiError> {
    for field in required {
        if !object.get(field.name).is_some_and(Value::is_present) {
            debug!("Missing required field {}", field.name);
            return Err(ApiError::MissingField(*field));
        }
    }
    Ok(())
}

/// Take a required field or fail with `<field>-error`.
pub fn require<T: Presence>(value: Option<T>, field: Field) -> Result<T, ApiError> {
    match value {
        Some(value) if value.is_present() => Ok(value),
        _ => {
            debug!("Missing required field {}", field.name);
            Err(ApiError::MissingField(field))
        }
    }
}

/// Keep an optional field only when it is present.
pub fn optional<T: Presence>(value: Option<T>) -> Option<T> {
    value.filter(|value| value.is_present())
}

/// Checks shared by every handler: network selector and operator.
pub struct Validator {
    strict_network: bool,
}

impl Validator {
    pub fn new(strict_network: bool) -> Self {
        Self { strict_network }
    }

    /// Resolve the `network` field.
    ///
    /// In permissive mode anything but `"mainnet"` means testnet. In strict
    /// mode unknown names fail with `network-error`.
    pub fn network(&self, value: Option<String>) -> Result<Network, ApiError> {
        let name = require(value, fields::NETWORK)?;

        if self.strict_network {
            return Network::parse_strict(&name).ok_or_else(|| ApiError::InvalidField {
                field: fields::NETWORK,
                message: format!("Network must be mainnet or testnet, got {}", name),
            });
        }

        let network = Network::select(&name);
        if network.as_str() != name {
            warn!("Unrecognized network {:?}, falling back to {}", name, network);
        }
        Ok(network)
    }

    /// Check `accountId` then `userPrivateKey`, in that order.
    pub fn operator(
        &self,
        account_id: Option<String>,
        private_key: Option<String>,
    ) -> Result<Operator, ApiError> {
        let account_id = require(account_id, fields::ACCOUNT_ID)?;
        let private_key = require(private_key, fields::USER_PRIVATE_KEY)?;
        Ok(Operator {
            account_id,
            private_key,
        })
    }
}
