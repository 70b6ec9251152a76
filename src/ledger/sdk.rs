//! Hedera SDK Backend
//!
//! Submits every operation to the public network through the Hedera SDK.
//! A fresh client is built per request for the selected network, with the
//! request's operator as payer. Nothing is cached between requests.

use super::{hbar_to_tinybars, Ledger, LedgerError, LedgerResult};
use crate::{
    AccountCreate, AccountUpdate, CreatedAccount, CreatedToken, Network, Operator, Submitted,
    SupplyChange, TokenAssociation, TokenCreate, TokenDelete, TokenKeys, TokenTransfer, TokenType,
    TokenUpdate,
};
use ::hedera::{
    AccountCreateTransaction, AccountId, AccountUpdateTransaction, Client, Hbar, NftId,
    PrivateKey, PublicKey, TokenAssociateTransaction, TokenBurnTransaction,
    TokenCreateTransaction, TokenDeleteTransaction, TokenDissociateTransaction, TokenId,
    TokenMintTransaction, TokenSupplyType, TokenUpdateTransaction, TransactionResponse,
    TransferTransaction,
};
use async_trait::async_trait;
use std::str::FromStr;
use time::{Duration, OffsetDateTime};
use tracing::debug;

impl From<::hedera::Error> for LedgerError {
    fn from(error: ::hedera::Error) -> Self {
        LedgerError::Sdk(error.to_string())
    }
}

/// Ledger backed by the public Hedera network.
#[derive(Debug, Default, Clone)]
pub struct HederaLedger;

impl HederaLedger {
    pub fn new() -> Self {
        Self
    }

    /// Client factory: pick the network profile and install the operator.
    fn client(network: Network, operator: &Operator) -> LedgerResult<Client> {
        let client = match network {
            Network::Mainnet => Client::for_mainnet(),
            Network::Testnet => Client::for_testnet(),
        };
        let account_id = AccountId::from_str(&operator.account_id)?;
        let private_key = PrivateKey::from_str(&operator.private_key)?;
        client.set_operator(account_id, private_key);

        debug!("Built {} client for operator {}", network, operator.account_id);
        Ok(client)
    }
}

#[async_trait]
impl Ledger for HederaLedger {
    async fn create_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountCreate,
    ) -> LedgerResult<CreatedAccount> {
        let client = Self::client(network, operator)?;
        let new_key = PrivateKey::generate_ed25519();
        let initial_balance = Hbar::from_tinybars(hbar_to_tinybars(request.initial_balance)?);

        let response = AccountCreateTransaction::new()
            .key(new_key.public_key())
            .initial_balance(initial_balance)
            .execute(&client)
            .await?;
        let receipt = response.get_receipt(&client).await?;
        let account_id = receipt
            .account_id
            .ok_or(LedgerError::MissingReceiptField("account id"))?;

        Ok(CreatedAccount {
            account_id: account_id.to_string(),
            private_key: new_key.to_string(),
            public_key: new_key.public_key().to_string(),
            transaction_id: response.transaction_id.to_string(),
        })
    }

    async fn update_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountUpdate,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = AccountUpdateTransaction::new();
        transaction.account_id(AccountId::from_str(&request.account_id)?);
        if let Some(key) = &request.new_key {
            transaction.key(public_key(key)?);
        }
        if let Some(period) = request.auto_renew_period {
            transaction.auto_renew_period(Duration::seconds(period));
        }
        if let Some(expiration) = request.expiration_time {
            transaction.expiration_time(timestamp(expiration)?);
        }
        if let Some(memo) = &request.memo {
            transaction.account_memo(memo.clone());
        }

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&operator.private_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn create_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenCreate,
    ) -> LedgerResult<CreatedToken> {
        let client = Self::client(network, operator)?;
        // NFT supply only counts minted serials.
        let initial_supply = match request.token_type {
            TokenType::FungibleCommon => request.initial_supply,
            TokenType::NonFungibleUnique => 0,
        };

        let mut transaction = TokenCreateTransaction::new();
        transaction
            .name(request.name.clone())
            .symbol(request.symbol.clone())
            .treasury_account_id(AccountId::from_str(&operator.account_id)?)
            .token_type(sdk_token_type(request.token_type))
            .initial_supply(initial_supply);

        if let Some(decimals) = request.decimals {
            transaction.decimals(decimals);
        }
        if let Some(max_supply) = request.max_supply {
            transaction
                .token_supply_type(TokenSupplyType::Finite)
                .max_supply(max_supply);
        }
        if let Some(freeze_default) = request.freeze_default {
            transaction.freeze_default(freeze_default);
        }
        let keys = RoleKeys::parse(&request.keys)?;
        if let Some(key) = keys.admin {
            transaction.admin_key(key);
        }
        if let Some(key) = keys.kyc {
            transaction.kyc_key(key);
        }
        if let Some(key) = keys.freeze {
            transaction.freeze_key(key);
        }
        if let Some(key) = keys.wipe {
            transaction.wipe_key(key);
        }
        if let Some(key) = keys.supply {
            transaction.supply_key(key);
        }
        if let Some(key) = keys.fee_schedule {
            transaction.fee_schedule_key(key);
        }
        if let Some(key) = keys.pause {
            transaction.pause_key(key);
        }
        if let Some(account) = &request.auto_renew_account {
            transaction.auto_renew_account_id(AccountId::from_str(account)?);
        }
        if let Some(period) = request.auto_renew_period {
            transaction.auto_renew_period(Duration::seconds(period));
        }
        if let Some(expiration) = request.expiration_time {
            transaction.expiration_time(timestamp(expiration)?);
        }
        if let Some(memo) = &request.memo {
            transaction.token_memo(memo.clone());
        }

        let response = transaction.execute(&client).await?;
        let receipt = response.get_receipt(&client).await?;
        let token_id = receipt
            .token_id
            .ok_or(LedgerError::MissingReceiptField("token id"))?;

        Ok(CreatedToken {
            token_id: token_id.to_string(),
            transaction_id: response.transaction_id.to_string(),
        })
    }

    async fn mint_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenMintTransaction::new();
        transaction.token_id(TokenId::from_str(&request.token_id)?);
        if let Some(amount) = request.amount {
            transaction.amount(amount);
        }
        if !request.metadata.is_empty() {
            transaction.metadata(request.metadata.iter().map(|entry| entry.as_bytes().to_vec()));
        }

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&request.supply_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn burn_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenBurnTransaction::new();
        transaction.token_id(TokenId::from_str(&request.token_id)?);
        if let Some(amount) = request.amount {
            transaction.amount(amount);
        }
        if !request.metadata.is_empty() {
            let serials = request
                .metadata
                .iter()
                .map(|serial| parse_serial(serial).and_then(|serial| to_signed("serial", serial)))
                .collect::<LedgerResult<Vec<i64>>>()?;
            transaction.serials(serials);
        }

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&request.supply_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn transfer_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenTransfer,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;
        let token_id = TokenId::from_str(&request.token_id)?;
        let sender = AccountId::from_str(&operator.account_id)?;
        let receiver = AccountId::from_str(&request.to_account_id)?;

        let mut transaction = TransferTransaction::new();
        if let Some(amount) = request.amount {
            let amount = to_signed("amount", amount)?;
            transaction
                .token_transfer(token_id, sender.clone(), -amount)
                .token_transfer(token_id, receiver.clone(), amount);
        }
        for serial in &request.serials {
            let nft = NftId {
                token_id,
                serial: parse_serial(serial)?,
            };
            transaction.nft_transfer(nft, sender.clone(), receiver.clone());
        }

        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn associate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenAssociateTransaction::new();
        transaction
            .account_id(AccountId::from_str(&request.account_id)?)
            .token_ids([TokenId::from_str(&request.token_id)?]);

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&request.account_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn dissociate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenDissociateTransaction::new();
        transaction
            .account_id(AccountId::from_str(&request.account_id)?)
            .token_ids([TokenId::from_str(&request.token_id)?]);

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&request.account_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn update_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenUpdate,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenUpdateTransaction::new();
        transaction.token_id(TokenId::from_str(&request.token_id)?);
        if let Some(name) = &request.name {
            transaction.token_name(name.clone());
        }
        if let Some(symbol) = &request.symbol {
            transaction.token_symbol(symbol.clone());
        }
        let keys = RoleKeys::parse(&request.keys)?;
        if let Some(key) = keys.admin {
            transaction.admin_key(key);
        }
        if let Some(key) = keys.kyc {
            transaction.kyc_key(key);
        }
        if let Some(key) = keys.freeze {
            transaction.freeze_key(key);
        }
        if let Some(key) = keys.wipe {
            transaction.wipe_key(key);
        }
        if let Some(key) = keys.supply {
            transaction.supply_key(key);
        }
        if let Some(key) = keys.fee_schedule {
            transaction.fee_schedule_key(key);
        }
        if let Some(key) = keys.pause {
            transaction.pause_key(key);
        }
        if let Some(account) = &request.auto_renew_account {
            transaction.auto_renew_account_id(AccountId::from_str(account)?);
        }
        if let Some(period) = request.auto_renew_period {
            transaction.auto_renew_period(Duration::seconds(period));
        }
        if let Some(expiration) = request.expiration_time {
            transaction.expiration_time(timestamp(expiration)?);
        }
        if let Some(memo) = &request.memo {
            transaction.token_memo(memo.clone());
        }

        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }

    async fn delete_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenDelete,
    ) -> LedgerResult<Submitted> {
        let client = Self::client(network, operator)?;

        let mut transaction = TokenDeleteTransaction::new();
        transaction.token_id(TokenId::from_str(&request.token_id)?);

        transaction.freeze_with(&client)?;
        transaction.sign(PrivateKey::from_str(&request.admin_key)?);
        let response = transaction.execute(&client).await?;
        confirm(&client, response).await
    }
}

/// Parsed role keys for token create/update.
struct RoleKeys {
    admin: Option<PublicKey>,
    kyc: Option<PublicKey>,
    freeze: Option<PublicKey>,
    wipe: Option<PublicKey>,
    supply: Option<PublicKey>,
    fee_schedule: Option<PublicKey>,
    pause: Option<PublicKey>,
}

impl RoleKeys {
    fn parse(keys: &TokenKeys) -> LedgerResult<Self> {
        let parse = |key: &Option<String>| key.as_deref().map(public_key).transpose();
        Ok(Self {
            admin: parse(&keys.admin)?,
            kyc: parse(&keys.kyc)?,
            freeze: parse(&keys.freeze)?,
            wipe: parse(&keys.wipe)?,
            supply: parse(&keys.supply)?,
            fee_schedule: parse(&keys.fee_schedule)?,
            pause: parse(&keys.pause)?,
        })
    }
}

/// Wait for the receipt; a failed status comes back as an SDK error.
async fn confirm(client: &Client, response: TransactionResponse) -> LedgerResult<Submitted> {
    response.get_receipt(client).await?;
    Ok(Submitted {
        transaction_id: response.transaction_id.to_string(),
    })
}

/// Accept a public key, or derive one from a private key string.
fn public_key(key: &str) -> LedgerResult<PublicKey> {
    match PublicKey::from_str(key) {
        Ok(key) => Ok(key),
        Err(_) => Ok(PrivateKey::from_str(key)?.public_key()),
    }
}

fn sdk_token_type(token_type: TokenType) -> ::hedera::TokenType {
    match token_type {
        TokenType::FungibleCommon => ::hedera::TokenType::FungibleCommon,
        TokenType::NonFungibleUnique => ::hedera::TokenType::NonFungibleUnique,
    }
}

fn timestamp(seconds: i64) -> LedgerResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| LedgerError::InvalidInput {
        what: "expiration time",
        value: seconds.to_string(),
    })
}

fn parse_serial(serial: &str) -> LedgerResult<u64> {
    serial.trim().parse().map_err(|_| LedgerError::InvalidInput {
        what: "serial number",
        value: serial.to_string(),
    })
}

fn to_signed(what: &'static str, value: u64) -> LedgerResult<i64> {
    i64::try_from(value).map_err(|_| LedgerError::InvalidInput {
        what,
        value: value.to_string(),
    })
}
