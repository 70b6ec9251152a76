//! Simulated Ledger Module
//!
//! An in-process stand-in for the public network. It accepts the same
//! commands as the SDK backend and applies the checks the network would
//! apply before reporting a receipt:
//! - operator account ids and keys must parse
//! - role keys must match the key recorded on the token
//! - supply, balances and associations are tracked per token, NFTs by serial
//!
//! Every accepted transaction is recorded as a [`Submission`] so callers
//! can inspect which network and signers a request ended up using.

use super::keys::{self, KeyPair};
use super::{hbar_to_tinybars, Ledger, LedgerError, LedgerResult};
use crate::{
    AccountCreate, AccountUpdate, CreatedAccount, CreatedToken, Network, Operator, Submitted,
    SupplyChange, TokenAssociation, TokenCreate, TokenDelete, TokenKeys, TokenTransfer, TokenType,
    TokenUpdate,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Entity number handed to the first account or token created.
pub const FIRST_ENTITY_NUM: u64 = 10_000;

/// Largest supply a token may reach; amounts are signed 64-bit on the network.
pub const MAX_TOKEN_SUPPLY: u64 = i64::MAX as u64;

/// Kind of transaction a [`Submission`] recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    AccountCreate,
    AccountUpdate,
    TokenCreate,
    TokenMint,
    TokenBurn,
    TokenTransfer,
    TokenAssociate,
    TokenDissociate,
    TokenUpdate,
    TokenDelete,
}

/// A transaction the simulated ledger accepted.
#[derive(Debug, Clone)]
pub struct Submission {
    pub network: Network,
    pub kind: TransactionKind,
    pub transaction_id: String,
    pub payer: String,
    /// Public keys of every signer, operator first.
    pub signers: Vec<String>,
}

/// Snapshot of a simulated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub public_key: String,
    /// Tinybars.
    pub balance: u64,
    pub memo: Option<String>,
    pub auto_renew_period: Option<i64>,
    pub expiration_time: Option<i64>,
}

/// Snapshot of a simulated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub token_type: TokenType,
    pub treasury: String,
    pub total_supply: u64,
    pub memo: Option<String>,
    pub deleted: bool,
}

#[derive(Debug, Clone)]
struct Account {
    public_key: String,
    balance: u64,
    memo: Option<String>,
    auto_renew_period: Option<i64>,
    expiration_time: Option<i64>,
}

#[derive(Debug, Clone)]
struct Token {
    name: String,
    symbol: String,
    token_type: TokenType,
    treasury: String,
    total_supply: u64,
    max_supply: Option<u64>,
    admin_key: Option<String>,
    supply_key: Option<String>,
    memo: Option<String>,
    deleted: bool,
    balances: HashMap<String, u64>,
    associations: HashSet<String>,
    /// NFT serial number to owning account.
    nfts: BTreeMap<u64, String>,
    next_serial: u64,
}

struct LedgerState {
    next_entity_num: u64,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, Token>,
    submissions: Vec<Submission>,
}

/// In-memory ledger shared across requests.
#[derive(Clone)]
pub struct SimulatedLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(LedgerState {
                next_entity_num: FIRST_ENTITY_NUM,
                accounts: HashMap::new(),
                tokens: HashMap::new(),
                submissions: Vec::new(),
            })),
        }
    }

    /// Every transaction accepted so far, in submission order.
    pub async fn submissions(&self) -> Vec<Submission> {
        self.state.read().await.submissions.clone()
    }

    pub async fn token_info(&self, token_id: &str) -> Option<TokenInfo> {
        let state = self.state.read().await;
        state.tokens.get(token_id).map(|token| TokenInfo {
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            token_type: token.token_type,
            treasury: token.treasury.clone(),
            total_supply: token.total_supply,
            memo: token.memo.clone(),
            deleted: token.deleted,
        })
    }

    pub async fn token_balance(&self, token_id: &str, account_id: &str) -> Option<u64> {
        let state = self.state.read().await;
        state
            .tokens
            .get(token_id)
            .map(|token| token.balances.get(account_id).copied().unwrap_or(0))
    }

    /// Owner of one NFT serial, if it exists.
    pub async fn nft_owner(&self, token_id: &str, serial: u64) -> Option<String> {
        let state = self.state.read().await;
        state
            .tokens
            .get(token_id)
            .and_then(|token| token.nfts.get(&serial).cloned())
    }

    pub async fn account_info(&self, account_id: &str) -> Option<AccountInfo> {
        let state = self.state.read().await;
        state.accounts.get(account_id).map(|account| AccountInfo {
            public_key: account.public_key.clone(),
            balance: account.balance,
            memo: account.memo.clone(),
            auto_renew_period: account.auto_renew_period,
            expiration_time: account.expiration_time,
        })
    }
}

impl LedgerState {
    /// Check the operator the way the SDK and network would.
    ///
    /// Returns the operator's public key, which is the first signer.
    fn authorize(&self, operator: &Operator) -> LedgerResult<String> {
        parse_entity_id("account id", &operator.account_id)?;
        let pair = KeyPair::from_private_key(&operator.private_key)?;
        let public_key = pair.public_key();

        if let Some(account) = self.accounts.get(&operator.account_id) {
            if account.public_key != public_key {
                return Err(status(&operator.account_id, "INVALID_SIGNATURE"));
            }
        }
        Ok(public_key)
    }

    fn allocate_entity_id(&mut self) -> String {
        let num = self.next_entity_num;
        self.next_entity_num += 1;
        format!("0.0.{}", num)
    }

    fn record(
        &mut self,
        network: Network,
        kind: TransactionKind,
        payer: &str,
        signers: Vec<String>,
    ) -> String {
        let transaction_id = transaction_id(payer);
        debug!("Simulated {:?} accepted as {}", kind, transaction_id);
        self.submissions.push(Submission {
            network,
            kind,
            transaction_id: transaction_id.clone(),
            payer: payer.to_string(),
            signers,
        });
        transaction_id
    }

    fn live_token(&mut self, payer: &str, token_id: &str) -> LedgerResult<&mut Token> {
        parse_entity_id("token id", token_id)?;
        match self.tokens.get_mut(token_id) {
            Some(token) if token.deleted => Err(status(payer, "TOKEN_WAS_DELETED")),
            Some(token) => Ok(token),
            None => Err(status(payer, "INVALID_TOKEN_ID")),
        }
    }
}

#[async_trait]
impl Ledger for SimulatedLedger {
    async fn create_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountCreate,
    ) -> LedgerResult<CreatedAccount> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let balance = hbar_to_tinybars(request.initial_balance)? as u64;

        let new_key = KeyPair::generate();
        let account_id = state.allocate_entity_id();
        state.accounts.insert(
            account_id.clone(),
            Account {
                public_key: new_key.public_key(),
                balance,
                memo: None,
                auto_renew_period: None,
                expiration_time: None,
            },
        );

        let transaction_id = state.record(
            network,
            TransactionKind::AccountCreate,
            &operator.account_id,
            vec![payer_key],
        );

        Ok(CreatedAccount {
            account_id,
            private_key: new_key.private_key(),
            public_key: new_key.public_key(),
            transaction_id,
        })
    }

    async fn update_account(
        &self,
        network: Network,
        operator: &Operator,
        request: &AccountUpdate,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        parse_entity_id("account id", &request.account_id)?;

        let new_key = request
            .new_key
            .as_deref()
            .map(keys::normalize_public_key)
            .transpose()?;

        if let Some(account) = state.accounts.get_mut(&request.account_id) {
            if let Some(key) = new_key {
                account.public_key = key;
            }
            if request.memo.is_some() {
                account.memo = request.memo.clone();
            }
            if request.auto_renew_period.is_some() {
                account.auto_renew_period = request.auto_renew_period;
            }
            if request.expiration_time.is_some() {
                account.expiration_time = request.expiration_time;
            }
        }

        let transaction_id = state.record(
            network,
            TransactionKind::AccountUpdate,
            &operator.account_id,
            vec![payer_key.clone(), payer_key],
        );
        Ok(Submitted { transaction_id })
    }

    async fn create_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenCreate,
    ) -> LedgerResult<CreatedToken> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;

        let payer = operator.account_id.as_str();
        let (admin_key, supply_key) = parse_role_keys(&request.keys)?;
        if let Some(account) = &request.auto_renew_account {
            parse_entity_id("account id", account)?;
        }
        if request.max_supply.is_some_and(|max| max > MAX_TOKEN_SUPPLY) {
            return Err(status(payer, "INVALID_TOKEN_MAX_SUPPLY"));
        }
        let max_supply = request.max_supply.unwrap_or(MAX_TOKEN_SUPPLY);
        if request.initial_supply > max_supply {
            return Err(status(payer, "INVALID_TOKEN_INITIAL_SUPPLY"));
        }
        // NFT supply only counts minted serials.
        let initial_supply = match request.token_type {
            TokenType::FungibleCommon => request.initial_supply,
            TokenType::NonFungibleUnique => 0,
        };

        let treasury = operator.account_id.clone();
        let token_id = state.allocate_entity_id();
        state.tokens.insert(
            token_id.clone(),
            Token {
                name: request.name.clone(),
                symbol: request.symbol.clone(),
                token_type: request.token_type,
                treasury: treasury.clone(),
                total_supply: initial_supply,
                max_supply: request.max_supply,
                admin_key,
                supply_key,
                memo: request.memo.clone(),
                deleted: false,
                balances: HashMap::from([(treasury.clone(), initial_supply)]),
                associations: HashSet::from([treasury]),
                nfts: BTreeMap::new(),
                next_serial: 1,
            },
        );

        let transaction_id = state.record(
            network,
            TransactionKind::TokenCreate,
            &operator.account_id,
            vec![payer_key],
        );
        Ok(CreatedToken {
            token_id,
            transaction_id,
        })
    }

    async fn mint_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        let signer = keys::normalize_public_key(&request.supply_key)?;

        let token = state.live_token(payer, &request.token_id)?;
        check_role_key(payer, token.supply_key.as_deref(), &signer, "TOKEN_HAS_NO_SUPPLY_KEY")?;

        let amount = match token.token_type {
            TokenType::FungibleCommon => request.amount.unwrap_or(0),
            TokenType::NonFungibleUnique => request.metadata.len() as u64,
        };
        if amount == 0 {
            return Err(status(payer, "INVALID_TOKEN_MINT_AMOUNT"));
        }
        let new_supply = token
            .total_supply
            .checked_add(amount)
            .filter(|supply| *supply <= token.max_supply.unwrap_or(MAX_TOKEN_SUPPLY))
            .ok_or_else(|| status(payer, "TOKEN_MAX_SUPPLY_REACHED"))?;
        let treasury = token.treasury.clone();
        credit(&mut token.balances, &treasury, amount)
            .ok_or_else(|| status(payer, "TOKEN_MAX_SUPPLY_REACHED"))?;
        token.total_supply = new_supply;

        if token.token_type == TokenType::NonFungibleUnique {
            for _ in &request.metadata {
                token.nfts.insert(token.next_serial, treasury.clone());
                token.next_serial += 1;
            }
        }

        let transaction_id =
            state.record(network, TransactionKind::TokenMint, payer, vec![payer_key, signer]);
        Ok(Submitted { transaction_id })
    }

    async fn burn_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &SupplyChange,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        let signer = keys::normalize_public_key(&request.supply_key)?;

        let token = state.live_token(payer, &request.token_id)?;
        check_role_key(payer, token.supply_key.as_deref(), &signer, "TOKEN_HAS_NO_SUPPLY_KEY")?;

        let treasury = token.treasury.clone();
        let treasury_balance = token.balances.get(&treasury).copied().unwrap_or(0);
        let serials = match token.token_type {
            TokenType::FungibleCommon => Vec::new(),
            TokenType::NonFungibleUnique => owned_serials(
                payer,
                token,
                &request.metadata,
                &treasury,
                "TREASURY_MUST_OWN_BURNED_NFT",
            )?,
        };
        let amount = match token.token_type {
            TokenType::FungibleCommon => request.amount.unwrap_or(0),
            TokenType::NonFungibleUnique => serials.len() as u64,
        };
        if amount == 0 || amount > treasury_balance {
            return Err(status(payer, "INVALID_TOKEN_BURN_AMOUNT"));
        }
        for serial in &serials {
            token.nfts.remove(serial);
        }
        token.total_supply -= amount;
        token.balances.insert(treasury, treasury_balance - amount);

        let transaction_id =
            state.record(network, TransactionKind::TokenBurn, payer, vec![payer_key, signer]);
        Ok(Submitted { transaction_id })
    }

    async fn transfer_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenTransfer,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        parse_entity_id("account id", &request.to_account_id)?;

        let token = state.live_token(payer, &request.token_id)?;
        let serials = match token.token_type {
            TokenType::FungibleCommon if !request.serials.is_empty() => {
                return Err(status(payer, "NFT_TRANSFERS_ONLY_ALLOWED_FOR_NON_FUNGIBLE_UNIQUE"));
            }
            TokenType::NonFungibleUnique if request.amount.is_some() => {
                return Err(status(payer, "ACCOUNT_AMOUNT_TRANSFERS_ONLY_ALLOWED_FOR_FUNGIBLE_COMMON"));
            }
            TokenType::FungibleCommon => Vec::new(),
            TokenType::NonFungibleUnique => owned_serials(
                payer,
                token,
                &request.serials,
                payer,
                "SENDER_DOES_NOT_OWN_NFT_SERIAL_NO",
            )?,
        };
        let amount = match token.token_type {
            TokenType::FungibleCommon => request.amount.unwrap_or(0),
            TokenType::NonFungibleUnique => serials.len() as u64,
        };
        if amount == 0 {
            return Err(status(payer, "EMPTY_TOKEN_TRANSFER_ACCOUNT_AMOUNTS"));
        }
        if amount > MAX_TOKEN_SUPPLY {
            return Err(status(payer, "INVALID_ACCOUNT_AMOUNTS"));
        }
        if !token.associations.contains(&request.to_account_id) {
            return Err(status(payer, "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT"));
        }
        let sender_balance = token.balances.get(payer).copied().unwrap_or(0);
        if sender_balance < amount {
            return Err(status(payer, "INSUFFICIENT_TOKEN_BALANCE"));
        }
        let receiver_balance = token
            .balances
            .get(&request.to_account_id)
            .copied()
            .unwrap_or(0);
        if receiver_balance.checked_add(amount).is_none() {
            return Err(status(payer, "INVALID_ACCOUNT_AMOUNTS"));
        }

        token.balances.insert(payer.to_string(), sender_balance - amount);
        credit(&mut token.balances, &request.to_account_id, amount)
            .ok_or_else(|| status(payer, "INVALID_ACCOUNT_AMOUNTS"))?;
        for serial in serials {
            token.nfts.insert(serial, request.to_account_id.clone());
        }

        let transaction_id =
            state.record(network, TransactionKind::TokenTransfer, payer, vec![payer_key]);
        Ok(Submitted { transaction_id })
    }

    async fn associate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        parse_entity_id("account id", &request.account_id)?;
        let signer = KeyPair::from_private_key(&request.account_key)?.public_key();

        if let Some(account) = state.accounts.get(&request.account_id) {
            if account.public_key != signer {
                return Err(status(payer, "INVALID_SIGNATURE"));
            }
        }

        let token = state.live_token(payer, &request.token_id)?;
        if !token.associations.insert(request.account_id.clone()) {
            return Err(status(payer, "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT"));
        }

        let transaction_id =
            state.record(network, TransactionKind::TokenAssociate, payer, vec![payer_key, signer]);
        Ok(Submitted { transaction_id })
    }

    async fn dissociate_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenAssociation,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        parse_entity_id("account id", &request.account_id)?;
        let signer = KeyPair::from_private_key(&request.account_key)?.public_key();

        if let Some(account) = state.accounts.get(&request.account_id) {
            if account.public_key != signer {
                return Err(status(payer, "INVALID_SIGNATURE"));
            }
        }

        let token = state.live_token(payer, &request.token_id)?;
        if token.treasury == request.account_id {
            return Err(status(payer, "ACCOUNT_IS_TREASURY"));
        }
        if !token.associations.remove(&request.account_id) {
            return Err(status(payer, "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT"));
        }
        if token.balances.get(&request.account_id).copied().unwrap_or(0) > 0 {
            token.associations.insert(request.account_id.clone());
            return Err(status(payer, "TRANSACTION_REQUIRES_ZERO_TOKEN_BALANCES"));
        }

        let transaction_id = state.record(
            network,
            TransactionKind::TokenDissociate,
            payer,
            vec![payer_key, signer],
        );
        Ok(Submitted { transaction_id })
    }

    async fn update_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenUpdate,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();

        let (admin_key, supply_key) = parse_role_keys(&request.keys)?;
        if let Some(account) = &request.auto_renew_account {
            parse_entity_id("account id", account)?;
        }

        let token = state.live_token(payer, &request.token_id)?;
        // Only the operator signs, so the operator key has to be the admin key.
        check_role_key(payer, token.admin_key.as_deref(), &payer_key, "TOKEN_IS_IMMUTABLE")?;

        if let Some(name) = &request.name {
            token.name = name.clone();
        }
        if let Some(symbol) = &request.symbol {
            token.symbol = symbol.clone();
        }
        if admin_key.is_some() {
            token.admin_key = admin_key;
        }
        if supply_key.is_some() {
            token.supply_key = supply_key;
        }
        if request.memo.is_some() {
            token.memo = request.memo.clone();
        }

        let transaction_id =
            state.record(network, TransactionKind::TokenUpdate, payer, vec![payer_key]);
        Ok(Submitted { transaction_id })
    }

    async fn delete_token(
        &self,
        network: Network,
        operator: &Operator,
        request: &TokenDelete,
    ) -> LedgerResult<Submitted> {
        let mut state = self.state.write().await;
        let payer_key = state.authorize(operator)?;
        let payer = operator.account_id.as_str();
        let signer = KeyPair::from_private_key(&request.admin_key)?.public_key();

        let token = state.live_token(payer, &request.token_id)?;
        check_role_key(payer, token.admin_key.as_deref(), &signer, "TOKEN_IS_IMMUTABLE")?;
        token.deleted = true;

        let transaction_id =
            state.record(network, TransactionKind::TokenDelete, payer, vec![payer_key, signer]);
        Ok(Submitted { transaction_id })
    }
}

/// Parse every role key; returns the admin and supply keys in normalized form.
fn parse_role_keys(role_keys: &TokenKeys) -> LedgerResult<(Option<String>, Option<String>)> {
    let TokenKeys {
        admin,
        kyc,
        freeze,
        wipe,
        supply,
        fee_schedule,
        pause,
    } = role_keys;
    for key in [kyc, freeze, wipe, fee_schedule, pause]
        .into_iter()
        .flatten()
    {
        keys::parse_public_key(key)?;
    }
    let admin = admin.as_deref().map(keys::normalize_public_key).transpose()?;
    let supply = supply.as_deref().map(keys::normalize_public_key).transpose()?;
    Ok((admin, supply))
}

/// Parse NFT serials and check each is held by `owner`, without duplicates.
fn owned_serials(
    payer: &str,
    token: &Token,
    entries: &[String],
    owner: &str,
    not_owned_status: &'static str,
) -> LedgerResult<Vec<u64>> {
    let mut serials = Vec::with_capacity(entries.len());
    for entry in entries {
        let serial = entry
            .trim()
            .parse::<u64>()
            .map_err(|_| LedgerError::InvalidInput {
                what: "serial number",
                value: entry.clone(),
            })?;
        if serials.contains(&serial) {
            return Err(status(payer, "INVALID_NFT_ID"));
        }
        match token.nfts.get(&serial) {
            None => return Err(status(payer, "INVALID_NFT_ID")),
            Some(holder) if holder != owner => return Err(status(payer, not_owned_status)),
            Some(_) => serials.push(serial),
        }
    }
    Ok(serials)
}

/// Add `amount` to an account's balance, `None` on overflow.
fn credit(balances: &mut HashMap<String, u64>, account: &str, amount: u64) -> Option<()> {
    let balance = balances.entry(account.to_string()).or_insert(0);
    *balance = balance.checked_add(amount)?;
    Some(())
}

fn check_role_key(
    payer: &str,
    expected: Option<&str>,
    signer: &str,
    missing_status: &'static str,
) -> LedgerResult<()> {
    match expected {
        None => Err(status(payer, missing_status)),
        Some(expected) if expected != signer => Err(status(payer, "INVALID_SIGNATURE")),
        Some(_) => Ok(()),
    }
}

/// Parse `shard.realm.num`.
fn parse_entity_id(what: &'static str, id: &str) -> LedgerResult<(u64, u64, u64)> {
    let invalid = || LedgerError::InvalidInput {
        what,
        value: id.to_string(),
    };
    let mut parts = id.split('.').map(|part| part.parse::<u64>().map_err(|_| invalid()));
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(shard), Some(realm), Some(num), None) => Ok((shard?, realm?, num?)),
        _ => Err(invalid()),
    }
}

fn transaction_id(payer: &str) -> String {
    let now = chrono::Utc::now();
    format!("{}@{}.{:09}", payer, now.timestamp(), now.timestamp_subsec_nanos())
}

fn status(payer: &str, status: &'static str) -> LedgerError {
    LedgerError::Status {
        transaction_id: transaction_id(payer),
        status,
    }
}
