use crate::classify::Classifier;
use crate::config::ExpiryConfig;
use crate::error::ExpiryError;
use crate::process::SystemTaskResult;
use crate::records::ExpiryRecordStreaming;
use crate::removal::{AccountGc, ContractGc};
use crate::stats::SharedStats;
use crate::throttle::{MapAccessType, SharedThrottle};
use expiry_primitives::{EntityNum, ExpirableAccount};
use tracing::debug;

/// The removal workflow the orchestrator dispatches to.
pub trait RemovalWork {
    /// Attempts removal of a detached account past grace.
    fn try_to_remove_account(&mut self, num: EntityNum)
        -> Result<SystemTaskResult, ExpiryError>;

    /// Attempts removal of a detached contract past grace; storage must be
    /// fully purged before any crypto GC happens.
    fn try_to_remove_contract(&mut self, num: EntityNum)
        -> Result<SystemTaskResult, ExpiryError>;

    /// Marks a freshly-expired broke entity detached.
    fn try_to_mark_detached(
        &mut self,
        num: EntityNum,
        is_contract: bool,
    ) -> Result<SystemTaskResult, ExpiryError>;
}

/// Config-gated removal dispatch over the GC collaborators.
#[derive(Debug)]
pub struct RemovalHelper<C, A, G, R> {
    classifier: C,
    account_gc: A,
    contract_gc: G,
    records: R,
    config: ExpiryConfig,
    throttle: SharedThrottle,
    stats: SharedStats,
}

impl<C, A, G, R> RemovalHelper<C, A, G, R>
where
    C: Classifier,
    A: AccountGc,
    G: ContractGc,
    R: ExpiryRecordStreaming,
{
    /// Builds a removal helper over the given collaborators.
    pub fn new(
        classifier: C,
        account_gc: A,
        contract_gc: G,
        records: R,
        config: ExpiryConfig,
        throttle: SharedThrottle,
        stats: SharedStats,
    ) -> Self {
        Self { classifier, account_gc, contract_gc, records, config, throttle, stats }
    }

    fn remove(
        &mut self,
        num: EntityNum,
        account: &ExpirableAccount,
        is_contract: bool,
    ) -> Result<SystemTaskResult, ExpiryError> {
        let outcome = self.account_gc.expire_best_effort(num, account)?;
        // The record goes out whether or not this step finished the job.
        self.records.stream_crypto_removal_step(is_contract, num, &outcome);
        if outcome.finished {
            self.stats.write().expect("expiry stats lock poisoned").count_removed(is_contract);
            debug!(entity = %num, is_contract, "entity removal finished");
            Ok(SystemTaskResult::Done)
        } else {
            Ok(SystemTaskResult::NoCapacityLeft)
        }
    }
}

impl<C, A, G, R> RemovalWork for RemovalHelper<C, A, G, R>
where
    C: Classifier,
    A: AccountGc,
    G: ContractGc,
    R: ExpiryRecordStreaming,
{
    fn try_to_remove_account(
        &mut self,
        num: EntityNum,
    ) -> Result<SystemTaskResult, ExpiryError> {
        if !self.config.auto_renew_enabled {
            return Ok(SystemTaskResult::NothingToDo);
        }
        let Some(account) = self.classifier.last_classified() else {
            return Ok(SystemTaskResult::NothingToDo);
        };
        self.remove(num, &account, false)
    }

    fn try_to_remove_contract(
        &mut self,
        num: EntityNum,
    ) -> Result<SystemTaskResult, ExpiryError> {
        if !self.config.contract_auto_renew_enabled {
            return Ok(SystemTaskResult::NothingToDo);
        }
        let Some(contract) = self.classifier.last_classified() else {
            return Ok(SystemTaskResult::NothingToDo);
        };
        // Never expire a broke contract until its storage is purged.
        if !self.contract_gc.expire_best_effort(num, &contract)? {
            return Ok(SystemTaskResult::NoCapacityLeft);
        }
        self.remove(num, &contract, true)
    }

    fn try_to_mark_detached(
        &mut self,
        num: EntityNum,
        is_contract: bool,
    ) -> Result<SystemTaskResult, ExpiryError> {
        if !self.config.is_auto_renew_enabled_for(is_contract) {
            return Ok(SystemTaskResult::NothingToDo);
        }
        if !self
            .throttle
            .write()
            .expect("expiry throttle lock poisoned")
            .allow_one(MapAccessType::AccountsGetForModify)
        {
            return Ok(SystemTaskResult::NoCapacityLeft);
        }
        self.account_gc.mark_detached(num)?;
        Ok(SystemTaskResult::Done)
    }
}
