use crate::ids::{EntityId, EntityNum, NftId, Timestamp};
use serde::{Deserialize, Serialize};

/// Kind of token, which decides how an expired holder's balance is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// Interchangeable units tracked as a single balance per holder.
    FungibleCommon,
    /// Unique serials with per-NFT ownership.
    NonFungibleUnique,
}

/// The slice of a token's state the expiry pipeline cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token's treasury account, recipient of returned units.
    pub treasury: EntityId,
    /// Fungible or non-fungible.
    pub token_type: TokenType,
    /// Whether the token has been deleted; returns to a deleted token burn.
    pub deleted: bool,
}

impl Token {
    /// A live fungible token with the given treasury.
    pub const fn fungible(treasury: EntityId) -> Self {
        Self { treasury, token_type: TokenType::FungibleCommon, deleted: false }
    }

    /// A live non-fungible token with the given treasury.
    pub const fn non_fungible(treasury: EntityId) -> Self {
        Self { treasury, token_type: TokenType::NonFungibleUnique, deleted: false }
    }

    /// The treasury's entity number.
    pub const fn treasury_num(&self) -> EntityNum {
        self.treasury.as_num()
    }
}

/// An account or contract as the expiry pipeline sees it.
///
/// Token relationships and owned NFTs are threaded through state as linked
/// lists; only the list heads live on the account itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirableAccount {
    /// The entity number keying this account in state.
    pub key: EntityNum,
    /// Balance in tinybars.
    pub balance: i64,
    /// Consensus second at which this entity expires.
    pub expiry: Timestamp,
    /// Seconds of lifetime requested at each renewal.
    pub auto_renew_period: i64,
    /// Whether this entity is a smart contract.
    pub is_contract: bool,
    /// Whether this entity has been deleted by a user transaction.
    pub deleted: bool,
    /// Whether this entity has been marked detached (expired, zero balance,
    /// awaiting the end of its grace period).
    pub expired_and_pending_removal: bool,
    /// Account designated to fund this entity's auto-renewals, if any.
    pub auto_renew_account: Option<EntityNum>,
    /// Number of tokens for which this entity is the treasury.
    pub num_treasury_titles: u32,
    /// Count of NFTs owned by this entity.
    pub nfts_owned: u64,
    /// First token relationship in this entity's association list.
    pub head_token_num: Option<EntityNum>,
    /// First NFT in this entity's owned-NFTs list.
    pub head_nft_id: Option<NftId>,
    /// Key/value pairs in contract storage (zero for plain accounts).
    pub num_kv_pairs: u64,
}

impl ExpirableAccount {
    /// A plain account with the given key, balance, and expiry.
    pub fn account(key: EntityNum, balance: i64, expiry: Timestamp) -> Self {
        Self {
            key,
            balance,
            expiry,
            auto_renew_period: 0,
            is_contract: false,
            deleted: false,
            expired_and_pending_removal: false,
            auto_renew_account: None,
            num_treasury_titles: 0,
            nfts_owned: 0,
            head_token_num: None,
            head_nft_id: None,
            num_kv_pairs: 0,
        }
    }

    /// A smart contract with the given key, balance, and expiry.
    pub fn contract(key: EntityNum, balance: i64, expiry: Timestamp) -> Self {
        Self { is_contract: true, ..Self::account(key, balance, expiry) }
    }

    /// Sets the requested auto-renew period, builder style.
    #[must_use]
    pub const fn with_auto_renew_period(mut self, secs: i64) -> Self {
        self.auto_renew_period = secs;
        self
    }

    /// Sets the designated auto-renew payer, builder style.
    #[must_use]
    pub const fn with_auto_renew_account(mut self, num: EntityNum) -> Self {
        self.auto_renew_account = Some(num);
        self
    }

    /// Whether this entity is expired at the given consensus time.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiry <= now
    }

    /// Whether this entity serves as treasury for any token.
    pub const fn is_token_treasury(&self) -> bool {
        self.num_treasury_titles > 0
    }
}
