use crate::config::ExpiryConfig;
use crate::state::{LedgerState, SharedState};
use crate::throttle::{MapAccessType, SharedThrottle};
use expiry_primitives::{EntityNum, ExpirableAccount, Timestamp};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Outcome of classifying one entity at one consensus time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationResult {
    /// Nothing about this entity needs expiry work right now.
    Other,
    /// Classification could not get map-access capacity; retry on a later
    /// tick.
    ComeBackLater,
    /// Expired broke account not yet marked detached.
    DetachedAccount,
    /// Expired broke contract not yet marked detached.
    DetachedContract,
    /// Detached account whose grace period has ended.
    DetachedAccountGracePeriodOver,
    /// Detached contract whose grace period has ended.
    DetachedContractGracePeriodOver,
    /// Detached treasury past grace, but one of its tokens is still live.
    DetachedTreasuryGracePeriodOverBeforeToken,
    /// Expired account with a balance; eligible for renewal.
    ExpiredAccountReadyToRenew,
    /// Expired contract with a solvent payer; eligible for renewal.
    ExpiredContractReadyToRenew,
}

/// The classification oracle the orchestrator and workers consult.
///
/// `classify` refreshes the last-classified accessors as a side effect; the
/// renewal and removal workers read the entity (and payer) through them
/// rather than re-fetching from state.
pub trait Classifier {
    /// Classifies the entity's expiry status at the given consensus time.
    fn classify(&mut self, num: EntityNum, now: Timestamp) -> ClassificationResult;

    /// The most recently classified entity.
    fn last_classified(&self) -> Option<ExpirableAccount>;

    /// Number of the most recently classified entity.
    fn last_classified_num(&self) -> Option<EntityNum>;

    /// Designated fee payer for the most recently classified entity.
    fn payer_for_last_classified(&self) -> Option<ExpirableAccount>;

    /// Number of the designated fee payer.
    fn payer_num_for_last_classified(&self) -> Option<EntityNum>;
}

impl<C: Classifier> Classifier for Arc<RwLock<C>> {
    fn classify(&mut self, num: EntityNum, now: Timestamp) -> ClassificationResult {
        self.write().expect("classifier lock poisoned").classify(num, now)
    }

    fn last_classified(&self) -> Option<ExpirableAccount> {
        self.read().expect("classifier lock poisoned").last_classified()
    }

    fn last_classified_num(&self) -> Option<EntityNum> {
        self.read().expect("classifier lock poisoned").last_classified_num()
    }

    fn payer_for_last_classified(&self) -> Option<ExpirableAccount> {
        self.read().expect("classifier lock poisoned").payer_for_last_classified()
    }

    fn payer_num_for_last_classified(&self) -> Option<EntityNum> {
        self.read().expect("classifier lock poisoned").payer_num_for_last_classified()
    }
}

/// State-backed classifier.
#[derive(Debug)]
pub struct ClassificationWork<S> {
    state: SharedState<S>,
    throttle: SharedThrottle,
    config: ExpiryConfig,
    last_classified: Option<ExpirableAccount>,
    last_classified_num: Option<EntityNum>,
    payer: Option<ExpirableAccount>,
    payer_num: Option<EntityNum>,
}

impl<S: LedgerState> ClassificationWork<S> {
    /// Builds a classifier over the given state and throttle.
    pub fn new(state: SharedState<S>, throttle: SharedThrottle, config: ExpiryConfig) -> Self {
        Self {
            state,
            throttle,
            config,
            last_classified: None,
            last_classified_num: None,
            payer: None,
            payer_num: None,
        }
    }

    fn allow_one(&self, access: MapAccessType) -> bool {
        self.throttle.write().expect("expiry throttle lock poisoned").allow_one(access)
    }
}

impl<S: LedgerState> Classifier for ClassificationWork<S> {
    fn classify(&mut self, num: EntityNum, now: Timestamp) -> ClassificationResult {
        self.last_classified = None;
        self.last_classified_num = None;
        self.payer = None;
        self.payer_num = None;

        if !self.allow_one(MapAccessType::AccountsGet) {
            return ClassificationResult::ComeBackLater;
        }

        let state = Arc::clone(&self.state);
        let state = state.read().expect("ledger state lock poisoned");
        let Some(account) = state.account(num) else {
            return ClassificationResult::Other;
        };
        if account.deleted || !account.is_expired_at(now) {
            return ClassificationResult::Other;
        }
        let account = account.clone();

        if account.balance > 0 {
            // Funded and expired; resolve who pays for the renewal.
            let (payer_num, payer) = match account.auto_renew_account {
                Some(ara) if account.is_contract => {
                    if !self.allow_one(MapAccessType::AccountsGet) {
                        return ClassificationResult::ComeBackLater;
                    }
                    match state.account(ara) {
                        Some(p) if !p.deleted && p.balance > 0 => (ara, p.clone()),
                        _ => (num, account.clone()),
                    }
                }
                _ => (num, account.clone()),
            };
            let result = if account.is_contract {
                ClassificationResult::ExpiredContractReadyToRenew
            } else {
                ClassificationResult::ExpiredAccountReadyToRenew
            };
            debug!(entity = %num, payer = %payer_num, "classified as ready to renew");
            self.last_classified = Some(account);
            self.last_classified_num = Some(num);
            self.payer = Some(payer);
            self.payer_num = Some(payer_num);
            return result;
        }

        let is_contract = account.is_contract;
        if !account.expired_and_pending_removal {
            self.last_classified = Some(account);
            self.last_classified_num = Some(num);
            return if is_contract {
                ClassificationResult::DetachedContract
            } else {
                ClassificationResult::DetachedAccount
            };
        }

        if now < account.expiry.plus_secs(self.config.grace_period_secs) {
            // Detached, still within grace.
            return ClassificationResult::Other;
        }

        if account.is_token_treasury() {
            if !self.allow_one(MapAccessType::TokensGet) {
                return ClassificationResult::ComeBackLater;
            }
            if state.has_live_treasury_title(num) {
                return ClassificationResult::DetachedTreasuryGracePeriodOverBeforeToken;
            }
        }

        self.last_classified = Some(account);
        self.last_classified_num = Some(num);
        if is_contract {
            ClassificationResult::DetachedContractGracePeriodOver
        } else {
            ClassificationResult::DetachedAccountGracePeriodOver
        }
    }

    fn last_classified(&self) -> Option<ExpirableAccount> {
        self.last_classified.clone()
    }

    fn last_classified_num(&self) -> Option<EntityNum> {
        self.last_classified_num
    }

    fn payer_for_last_classified(&self) -> Option<ExpirableAccount> {
        self.payer.clone()
    }

    fn payer_num_for_last_classified(&self) -> Option<EntityNum> {
        self.payer_num
    }
}
