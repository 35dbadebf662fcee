use crate::classify::Classifier;
use crate::config::ExpiryConfig;
use crate::error::ExpiryError;
use crate::process::SystemTaskResult;
use crate::records::ExpiryRecordStreaming;
use crate::renewal::charging::{FeeDistributing, NonHapiFeeCharging};
use crate::renewal::fees::FeeCalculator;
use crate::state::{LedgerState, SharedState};
use crate::stats::SharedStats;
use crate::throttle::{MapAccessType, SharedThrottle};
use expiry_primitives::{EntityNum, Timestamp};
use tracing::debug;

/// Map accesses one renewal needs: the entity, its payer, and the collection
/// accounts credited by distribution.
const RENEWAL_WORK: [MapAccessType; 3] = [
    MapAccessType::AccountsGetForModify,
    MapAccessType::AccountsGetForModify,
    MapAccessType::AccountsGetForModify,
];

/// The renewal workflow the orchestrator dispatches to.
pub trait RenewalWork {
    /// Attempts renewal of an expired, funded account.
    fn try_to_renew_account(
        &mut self,
        num: EntityNum,
        now: Timestamp,
    ) -> Result<SystemTaskResult, ExpiryError>;

    /// Attempts renewal of an expired, funded contract.
    fn try_to_renew_contract(
        &mut self,
        num: EntityNum,
        now: Timestamp,
    ) -> Result<SystemTaskResult, ExpiryError>;
}

/// Config-gated renewal over the fee collaborators.
#[derive(Debug)]
pub struct RenewalHelper<S, C, F, D, R> {
    state: SharedState<S>,
    classifier: C,
    fees: F,
    charging: NonHapiFeeCharging<D>,
    records: R,
    config: ExpiryConfig,
    throttle: SharedThrottle,
    stats: SharedStats,
}

impl<S, C, F, D, R> RenewalHelper<S, C, F, D, R>
where
    S: LedgerState,
    C: Classifier,
    F: FeeCalculator,
    D: FeeDistributing,
    R: ExpiryRecordStreaming,
{
    /// Builds a renewal helper over the given collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: SharedState<S>,
        classifier: C,
        fees: F,
        charging: NonHapiFeeCharging<D>,
        records: R,
        config: ExpiryConfig,
        throttle: SharedThrottle,
        stats: SharedStats,
    ) -> Self {
        Self { state, classifier, fees, charging, records, config, throttle, stats }
    }

    fn renew(
        &mut self,
        num: EntityNum,
        now: Timestamp,
        is_contract: bool,
    ) -> Result<SystemTaskResult, ExpiryError> {
        // Deferring on denial leaves no partial mutation behind.
        if !self.throttle.write().expect("expiry throttle lock poisoned").allow(&RENEWAL_WORK) {
            return Ok(SystemTaskResult::NoCapacityLeft);
        }

        let Some(entity) = self.classifier.last_classified() else {
            return Ok(SystemTaskResult::NothingToDo);
        };
        let payer = self.classifier.payer_for_last_classified().unwrap_or_else(|| entity.clone());
        let payer_num = self.classifier.payer_num_for_last_classified().unwrap_or(num);

        let assessment =
            self.fees.assess_crypto_auto_renewal(&entity, entity.auto_renew_period, now, &payer);
        let new_expiry = now.plus_secs(assessment.renewal_period);

        {
            let mut state = self.state.write().expect("ledger state lock poisoned");
            state.account_mut(num)?.expiry = new_expiry;
            self.charging.charge_non_hapi_fee(payer_num, assessment.fee, &mut *state)?;
        }

        self.records.stream_crypto_renewal(
            num,
            assessment.fee,
            new_expiry.epoch_second(),
            is_contract,
        );
        self.stats.write().expect("expiry stats lock poisoned").count_renewed(is_contract);
        debug!(
            entity = %num,
            payer = %payer_num,
            fee = assessment.fee,
            new_expiry = new_expiry.epoch_second(),
            "entity renewed",
        );
        Ok(SystemTaskResult::Done)
    }
}

impl<S, C, F, D, R> RenewalWork for RenewalHelper<S, C, F, D, R>
where
    S: LedgerState,
    C: Classifier,
    F: FeeCalculator,
    D: FeeDistributing,
    R: ExpiryRecordStreaming,
{
    fn try_to_renew_account(
        &mut self,
        num: EntityNum,
        now: Timestamp,
    ) -> Result<SystemTaskResult, ExpiryError> {
        if !self.config.auto_renew_enabled {
            return Ok(SystemTaskResult::NothingToDo);
        }
        self.renew(num, now, false)
    }

    fn try_to_renew_contract(
        &mut self,
        num: EntityNum,
        now: Timestamp,
    ) -> Result<SystemTaskResult, ExpiryError> {
        if !self.config.contract_auto_renew_enabled {
            return Ok(SystemTaskResult::NothingToDo);
        }
        self.renew(num, now, true)
    }
}
