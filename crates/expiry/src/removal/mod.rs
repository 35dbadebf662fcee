//! Garbage collection of detached entities past their grace period.
//!
//! Removal is resumable: a large treasury may need several ticks to return
//! all of its fungible and non-fungible holdings, and each tick makes
//! best-effort progress under the map-access throttle.

mod account_gc;
mod contract_gc;
mod helper;
mod treasury_return;

pub use account_gc::{AccountGc, StateAccountGc};
pub use contract_gc::{ContractGc, StateContractGc};
pub use helper::{RemovalHelper, RemovalWork};
pub use treasury_return::TreasuryReturnHelper;

use expiry_primitives::{CurrencyAdjustments, EntityId, NftAdjustments};
use serde::{Deserialize, Serialize};

/// Fungible treasury returns achieved by one GC step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FungibleTreasuryReturns {
    /// Token types with returns in this step.
    pub token_types: Vec<EntityId>,
    /// Per-token transfer lists, aligned with `token_types`.
    pub transfers: Vec<CurrencyAdjustments>,
    /// Whether every fungible holding has now been returned.
    pub finished: bool,
}

impl FungibleTreasuryReturns {
    /// No returns needed, nothing left to do.
    pub const fn finished_noop() -> Self {
        Self { token_types: Vec::new(), transfers: Vec::new(), finished: true }
    }

    /// No returns made, work remains.
    pub const fn unfinished_noop() -> Self {
        Self { token_types: Vec::new(), transfers: Vec::new(), finished: false }
    }
}

/// Non-fungible treasury returns achieved by one GC step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NonFungibleTreasuryReturns {
    /// Token types with exchanges in this step.
    pub token_types: Vec<EntityId>,
    /// Per-token NFT exchanges, aligned with `token_types`.
    pub exchanges: Vec<NftAdjustments>,
    /// Whether every owned NFT has now been returned or burned.
    pub finished: bool,
}

impl NonFungibleTreasuryReturns {
    /// No exchanges needed, nothing left to do.
    pub const fn finished_noop() -> Self {
        Self { token_types: Vec::new(), exchanges: Vec::new(), finished: true }
    }

    /// No exchanges made, work remains.
    pub const fn unfinished_noop() -> Self {
        Self { token_types: Vec::new(), exchanges: Vec::new(), finished: false }
    }
}

/// Everything one best-effort crypto GC step achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoGcOutcome {
    /// Fungible returns made this step.
    pub fungible: FungibleTreasuryReturns,
    /// Non-fungible returns made this step.
    pub non_fungible: NonFungibleTreasuryReturns,
    /// Whether the removal is fully finished; true iff both nested returns
    /// report completion.
    pub finished: bool,
}

impl CryptoGcOutcome {
    /// Bundles the two return summaries, deriving overall completion.
    pub fn new(fungible: FungibleTreasuryReturns, non_fungible: NonFungibleTreasuryReturns) -> Self {
        let finished = fungible.finished && non_fungible.finished;
        Self { fungible, non_fungible, finished }
    }
}
