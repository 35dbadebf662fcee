use std::sync::{Arc, RwLock};

/// Handle to the throttle shared by the pipeline's workers.
pub type SharedThrottle = Arc<RwLock<ExpiryThrottle>>;

/// Kinds of state-map access the expiry pipeline performs, each with a fixed
/// work cost against the per-round capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapAccessType {
    /// Read an account.
    AccountsGet,
    /// Read an account for mutation.
    AccountsGetForModify,
    /// Read a contract storage slot.
    StorageGet,
    /// Write a contract storage slot.
    StoragePut,
    /// Remove a contract storage slot.
    StorageRemove,
    /// Read a token.
    TokensGet,
    /// Read a token relationship.
    TokenRelsGet,
    /// Read a token relationship for mutation.
    TokenRelsGetForModify,
    /// Remove a token relationship.
    TokenRelsRemove,
    /// Read an NFT.
    NftsGet,
    /// Read an NFT for mutation.
    NftsGetForModify,
    /// Remove an NFT.
    NftsRemove,
}

impl MapAccessType {
    /// The work units one access of this kind consumes.
    pub const fn work_units(self) -> u64 {
        match self {
            Self::AccountsGet | Self::StorageGet | Self::TokensGet | Self::TokenRelsGet
            | Self::NftsGet => 1,
            Self::AccountsGetForModify | Self::TokenRelsGetForModify
            | Self::NftsGetForModify => 2,
            Self::StoragePut | Self::StorageRemove | Self::TokenRelsRemove
            | Self::NftsRemove => 3,
        }
    }
}

/// Rate limiter bounding how much state-map work the expiry pipeline may do
/// in one consensus round.
///
/// All-or-nothing: a denied request consumes nothing, so a worker that was
/// refused capacity has performed no partial mutation.
#[derive(Debug)]
pub struct ExpiryThrottle {
    capacity_per_round: u64,
    used: u64,
}

impl ExpiryThrottle {
    /// A throttle allowing the given work units per round.
    pub const fn new(capacity_per_round: u64) -> Self {
        Self { capacity_per_round, used: 0 }
    }

    /// A throttle that never denies; used where capacity is managed elsewhere.
    pub const fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    /// Reserves capacity for all the given accesses, or for none of them.
    pub fn allow(&mut self, accesses: &[MapAccessType]) -> bool {
        let needed: u64 = accesses.iter().map(|a| a.work_units()).sum();
        if self.used.saturating_add(needed) > self.capacity_per_round {
            return false;
        }
        self.used += needed;
        true
    }

    /// Reserves capacity for a single access.
    pub fn allow_one(&mut self, access: MapAccessType) -> bool {
        self.allow(&[access])
    }

    /// Refills the capacity at the start of a new round.
    pub fn reset_round(&mut self) {
        self.used = 0;
    }

    /// Work units still available this round.
    pub const fn remaining(&self) -> u64 {
        self.capacity_per_round - self.used
    }

    /// Wraps this throttle in the shared handle the workers expect.
    pub fn into_shared(self) -> SharedThrottle {
        Arc::new(RwLock::new(self))
    }
}
