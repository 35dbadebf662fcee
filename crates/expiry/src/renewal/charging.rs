use crate::state::{LedgerError, LedgerState};
use expiry_primitives::EntityNum;
use renewal_fees::{credit_plan, FeeDistributionParams};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Distributes an already-charged fee to the network's collection accounts.
pub trait FeeDistributing {
    /// Credits the collection accounts with their shares of `fee`.
    fn distribute_charged_fee(
        &mut self,
        fee: i64,
        state: &mut dyn LedgerState,
    ) -> Result<(), LedgerError>;
}

impl<T: FeeDistributing> FeeDistributing for Arc<RwLock<T>> {
    fn distribute_charged_fee(
        &mut self,
        fee: i64,
        state: &mut dyn LedgerState,
    ) -> Result<(), LedgerError> {
        self.write().expect("fee distribution lock poisoned").distribute_charged_fee(fee, state)
    }
}

/// [`FeeDistributing`] backed by the configured credit plan.
#[derive(Debug, Clone)]
pub struct FeeDistribution {
    params: FeeDistributionParams,
}

impl FeeDistribution {
    /// Builds a distribution over the configured collection accounts.
    pub const fn new(params: FeeDistributionParams) -> Self {
        Self { params }
    }
}

impl FeeDistributing for FeeDistribution {
    fn distribute_charged_fee(
        &mut self,
        fee: i64,
        state: &mut dyn LedgerState,
    ) -> Result<(), LedgerError> {
        for (account, amount) in credit_plan(&self.params, fee) {
            state.account_mut(account)?.balance += amount;
        }
        Ok(())
    }
}

/// Charges fees outside the normal transaction path (no payer signature, no
/// user-submitted record): debit the payer, then distribute.
#[derive(Debug)]
pub struct NonHapiFeeCharging<D> {
    distribution: D,
}

impl<D: FeeDistributing> NonHapiFeeCharging<D> {
    /// Builds a charging helper over the given distribution.
    pub const fn new(distribution: D) -> Self {
        Self { distribution }
    }

    /// Debits `fee` from `payer` and distributes it. The fee must have been
    /// assessed against the payer's balance, so an uncovered charge is a
    /// state inconsistency, not a routine outcome.
    pub fn charge_non_hapi_fee(
        &mut self,
        payer: EntityNum,
        fee: i64,
        state: &mut dyn LedgerState,
    ) -> Result<(), LedgerError> {
        let payer_account = state.account_mut(payer)?;
        if payer_account.balance < fee {
            return Err(LedgerError::InsufficientBalance {
                account: payer,
                balance: payer_account.balance,
                fee,
            });
        }
        payer_account.balance -= fee;
        debug!(payer = %payer, fee, "charged non-HAPI fee");
        self.distribution.distribute_charged_fee(fee, state)
    }
}
