use crate::config::ExpiryConfig;
use crate::removal::treasury_return::TreasuryReturnHelper;
use crate::removal::{CryptoGcOutcome, FungibleTreasuryReturns, NonFungibleTreasuryReturns};
use crate::state::{LedgerError, LedgerState, SharedState};
use crate::throttle::{MapAccessType, SharedThrottle};
use expiry_primitives::{EntityNum, ExpirableAccount, TokenType};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Garbage collection of an expired account's crypto state.
pub trait AccountGc {
    /// Makes best-effort progress returning the entity's holdings and, once
    /// they are drained, removes the entity itself.
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        account: &ExpirableAccount,
    ) -> Result<CryptoGcOutcome, LedgerError>;

    /// Marks the entity detached (expired and pending removal).
    fn mark_detached(&mut self, num: EntityNum) -> Result<(), LedgerError>;
}

impl<T: AccountGc> AccountGc for Arc<RwLock<T>> {
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        account: &ExpirableAccount,
    ) -> Result<CryptoGcOutcome, LedgerError> {
        self.write().expect("account GC lock poisoned").expire_best_effort(num, account)
    }

    fn mark_detached(&mut self, num: EntityNum) -> Result<(), LedgerError> {
        self.write().expect("account GC lock poisoned").mark_detached(num)
    }
}

/// State-backed [`AccountGc`].
///
/// Walks the account's token-relationship list returning fungible balances,
/// then its owned-NFT list returning (or burning) each NFT, every step gated
/// by the throttle and bounded by the configured per-touch unit budget. The
/// list heads advance as work completes, so an interrupted removal resumes
/// exactly where it stopped on the next tick.
#[derive(Debug)]
pub struct StateAccountGc<S> {
    state: SharedState<S>,
    throttle: SharedThrottle,
    config: ExpiryConfig,
    returns: TreasuryReturnHelper,
}

impl<S: LedgerState> StateAccountGc<S> {
    /// Builds an account GC over the given state and throttle.
    pub fn new(state: SharedState<S>, throttle: SharedThrottle, config: ExpiryConfig) -> Self {
        Self { state, throttle, config, returns: TreasuryReturnHelper::new() }
    }

    fn allow(&self, accesses: &[MapAccessType]) -> bool {
        self.throttle.write().expect("expiry throttle lock poisoned").allow(accesses)
    }
}

impl<S: LedgerState> AccountGc for StateAccountGc<S> {
    fn expire_best_effort(
        &mut self,
        num: EntityNum,
        account: &ExpirableAccount,
    ) -> Result<CryptoGcOutcome, LedgerError> {
        let mut fungible = FungibleTreasuryReturns::finished_noop();
        let mut non_fungible = NonFungibleTreasuryReturns::finished_noop();
        let mut touched = 0usize;

        let state = Arc::clone(&self.state);
        let mut state = state.write().expect("ledger state lock poisoned");

        // Return fungible balances while dissociating every token.
        loop {
            let Some(rel) = state.head_token_rel(num) else {
                break;
            };
            if touched >= self.config.max_returned_units_per_touch
                || !self.allow(&[
                    MapAccessType::TokensGet,
                    MapAccessType::TokenRelsGetForModify,
                    MapAccessType::TokenRelsRemove,
                ])
            {
                fungible.finished = false;
                break;
            }
            if let Some(token) = state.token(rel.token).cloned() {
                if token.token_type == TokenType::FungibleCommon && rel.balance > 0 {
                    fungible.token_types.push(rel.token.to_entity_id());
                    self.returns.update_fungible_returns(
                        &mut *state,
                        num,
                        rel.token,
                        &token,
                        rel.balance,
                        &mut fungible.transfers,
                    );
                }
            }
            state.remove_token_rel(num, rel.token)?;
            touched += 1;
        }

        // Return or burn owned NFTs.
        loop {
            let Some(root) = state.account(num).and_then(|a| a.head_nft_id) else {
                break;
            };
            if touched >= self.config.max_returned_units_per_touch
                || !self.allow(&[MapAccessType::NftsGetForModify, MapAccessType::NftsRemove])
            {
                non_fungible.finished = false;
                break;
            }
            let burn = match state.token(root.token).cloned() {
                Some(token) => {
                    self.returns.update_nft_returns(
                        &mut *state,
                        num,
                        root.token,
                        &token,
                        root.serial_no,
                        &mut non_fungible.token_types,
                        &mut non_fungible.exchanges,
                    );
                    token.deleted
                }
                // No token record left to return to; burn outright.
                None => true,
            };
            let next = self.returns.burn_or_return_nft(&mut *state, burn, root)?;
            let entity = state.account_mut(num)?;
            entity.head_nft_id = next;
            entity.nfts_owned = entity.nfts_owned.saturating_sub(1);
            touched += 1;
        }

        let outcome = CryptoGcOutcome::new(fungible, non_fungible);
        if outcome.finished {
            state.remove_account(num)?;
            debug!(entity = %num, balance = account.balance, "entity fully garbage-collected");
        }
        Ok(outcome)
    }

    fn mark_detached(&mut self, num: EntityNum) -> Result<(), LedgerError> {
        let mut state = self.state.write().expect("ledger state lock poisoned");
        state.account_mut(num)?.expired_and_pending_removal = true;
        debug!(entity = %num, "entity marked detached");
        Ok(())
    }
}
