use crate::config::ExpiryConfig;
use crate::state::{LedgerError, LedgerState, SharedState};
use crate::throttle::{MapAccessType, SharedThrottle};
use expiry_primitives::{EntityNum, ExpirableAccount};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Garbage collection of an expired contract's storage.
pub trait ContractGc {
    /// Purges as much of the contract's storage as current capacity allows;
    /// reports whether the storage is now fully purged.
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        contract: &ExpirableAccount,
    ) -> Result<bool, LedgerError>;
}

impl<T: ContractGc> ContractGc for Arc<RwLock<T>> {
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        contract: &ExpirableAccount,
    ) -> Result<bool, LedgerError> {
        self.write().expect("contract GC lock poisoned").expire_best_effort(num, contract)
    }
}

/// State-backed [`ContractGc`].
#[derive(Debug)]
pub struct StateContractGc<S> {
    state: SharedState<S>,
    throttle: SharedThrottle,
    config: ExpiryConfig,
}

impl<S: LedgerState> StateContractGc<S> {
    /// Builds a contract GC over the given state and throttle.
    pub fn new(state: SharedState<S>, throttle: SharedThrottle, config: ExpiryConfig) -> Self {
        Self { state, throttle, config }
    }
}

impl<S: LedgerState> ContractGc for StateContractGc<S> {
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        contract: &ExpirableAccount,
    ) -> Result<bool, LedgerError> {
        let mut state = self.state.write().expect("ledger state lock poisoned");
        let mut purged = 0usize;
        while state.num_storage_slots(num) > 0
            && purged < self.config.max_returned_units_per_touch
            && self
                .throttle
                .write()
                .expect("expiry throttle lock poisoned")
                .allow_one(MapAccessType::StorageRemove)
        {
            let removed = state.purge_storage_slots(num, 1);
            if removed.is_empty() {
                break;
            }
            purged += removed.len();
        }
        let fully_purged = state.num_storage_slots(num) == 0;
        debug!(
            contract = %num,
            kv_pairs = contract.num_kv_pairs,
            purged,
            fully_purged,
            "contract storage purge step",
        );
        Ok(fully_purged)
    }
}
