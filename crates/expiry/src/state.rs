use alloy_primitives::B256;
use expiry_primitives::{EntityId, EntityNum, ExpirableAccount, NftId, Token};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Handle to ledger state shared across the pipeline's workers.
///
/// Processing is strictly sequential (the scheduler never issues concurrent
/// `process` calls), so the lock only arbitrates between collaborators within
/// one tick.
pub type SharedState<S> = Arc<RwLock<S>>;

/// Errors raised by ledger-state operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No account with the given number exists.
    #[error("no such account: {0}")]
    MissingAccount(EntityNum),
    /// No relationship between the given account and token exists.
    #[error("account {account} has no relationship with token {token}")]
    MissingTokenRel {
        /// The account side of the relationship.
        account: EntityNum,
        /// The token side of the relationship.
        token: EntityNum,
    },
    /// No NFT with the given id exists.
    #[error("no such NFT: {0:?}")]
    MissingNft(NftId),
    /// A payer's balance did not cover a charged fee.
    #[error("account {account} balance {balance} cannot cover fee {fee}")]
    InsufficientBalance {
        /// The charged account.
        account: EntityNum,
        /// Its balance at charging time.
        balance: i64,
        /// The fee that was to be charged.
        fee: i64,
    },
}

/// One account/token relationship as seen by the GC walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRel {
    /// The associated token.
    pub token: EntityNum,
    /// Units of the token held through this relationship.
    pub balance: i64,
}

/// One NFT's mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueNft {
    /// Current owner; `MISSING_ENTITY_ID` once returned to its treasury.
    pub owner: EntityId,
    /// Next NFT in the owner's list, if any.
    pub next: Option<NftId>,
}

/// The slice of node state the expiry pipeline reads and mutates.
///
/// This is the seam in front of the node's account, token, token-relationship,
/// NFT, and contract-storage maps. Accounts thread their token relationships
/// and owned NFTs as lists; implementations maintain the account-side head
/// pointers as relationships and NFTs are removed.
pub trait LedgerState {
    /// The account with the given number, if present.
    fn account(&self, num: EntityNum) -> Option<&ExpirableAccount>;

    /// Mutable access to the account with the given number.
    fn account_mut(&mut self, num: EntityNum) -> Result<&mut ExpirableAccount, LedgerError>;

    /// Removes the account record entirely.
    fn remove_account(&mut self, num: EntityNum) -> Result<(), LedgerError>;

    /// The token with the given number, if present.
    fn token(&self, num: EntityNum) -> Option<&Token>;

    /// Whether the account is treasury of at least one undeleted token.
    fn has_live_treasury_title(&self, num: EntityNum) -> bool;

    /// First relationship in the account's association list, if any.
    fn head_token_rel(&self, account: EntityNum) -> Option<TokenRel>;

    /// Removes one relationship, advancing the account's list head.
    fn remove_token_rel(&mut self, account: EntityNum, token: EntityNum)
        -> Result<(), LedgerError>;

    /// Adjusts the balance of an existing relationship.
    fn adjust_token_rel_balance(
        &mut self,
        account: EntityNum,
        token: EntityNum,
        delta: i64,
    ) -> Result<(), LedgerError>;

    /// The NFT with the given id, if present.
    fn nft(&self, id: NftId) -> Option<UniqueNft>;

    /// Reassigns an NFT's owner (to the missing id when treasury-returned).
    fn set_nft_owner(&mut self, id: NftId, owner: EntityId) -> Result<(), LedgerError>;

    /// Removes (burns) an NFT.
    fn remove_nft(&mut self, id: NftId) -> Result<(), LedgerError>;

    /// Number of storage slots still held by the given contract.
    fn num_storage_slots(&self, contract: EntityNum) -> u64;

    /// Removes up to `max_slots` of the contract's storage slots, returning
    /// the keys actually purged.
    fn purge_storage_slots(&mut self, contract: EntityNum, max_slots: usize) -> Vec<B256>;
}
