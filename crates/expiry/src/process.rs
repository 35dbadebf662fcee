use crate::classify::{ClassificationResult, Classifier};
use crate::error::ExpiryError;
use crate::records::ConsensusTimeTracker;
use crate::removal::RemovalWork;
use crate::renewal::RenewalWork;
use expiry_primitives::{EntityNum, Timestamp};
use tracing::{debug, warn};

/// What one `process` call achieved, for the scheduler to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTaskResult {
    /// The round has no standalone record time left; end the round and retry
    /// in a different context.
    NeedsDifferentContext,
    /// The entity needs no expiry work under current configuration.
    NothingToDo,
    /// Work exists but capacity ran out; retry the entity on a later tick.
    NoCapacityLeft,
    /// The tick's work completed.
    Done,
}

/// The per-entity expiry state machine.
///
/// Invoked once per candidate entity per consensus round. A single call makes
/// exactly one classification and one dispatch; any "can't do it right now"
/// condition comes back as a [`SystemTaskResult`] value so the scheduler can
/// decide whether to retry the entity, move on, or end the round.
#[derive(Debug)]
pub struct ExpiryProcess<C, RN, RM, T> {
    classifier: C,
    renewal: RN,
    removal: RM,
    time_tracker: T,
}

impl<C, RN, RM, T> ExpiryProcess<C, RN, RM, T>
where
    C: Classifier,
    RN: RenewalWork,
    RM: RemovalWork,
    T: ConsensusTimeTracker,
{
    /// Builds the orchestrator over its four collaborators.
    pub fn new(classifier: C, renewal: RN, removal: RM, time_tracker: T) -> Self {
        Self { classifier, renewal, removal, time_tracker }
    }

    /// Classifies the entity and dispatches to the renewal or removal
    /// workflow.
    ///
    /// Mutation (charge, extend, remove) always follows classification, and
    /// record emission is the last observable side effect.
    pub fn process(
        &mut self,
        entity_num: u64,
        now: Timestamp,
    ) -> Result<SystemTaskResult, ExpiryError> {
        // Hard precondition: without record time, touch nothing.
        if !self.time_tracker.has_more_standalone_record_time() {
            return Ok(SystemTaskResult::NeedsDifferentContext);
        }

        let num = EntityNum::from_num(entity_num);
        let classification = self.classifier.classify(num, now);
        debug!(entity = %num, ?classification, "classified entity");

        match classification {
            ClassificationResult::Other
            | ClassificationResult::DetachedTreasuryGracePeriodOverBeforeToken => {
                Ok(SystemTaskResult::NothingToDo)
            }
            ClassificationResult::ComeBackLater => {
                warn!(entity = %num, "Postponing expiry work, no throttle capacity now");
                Ok(SystemTaskResult::NoCapacityLeft)
            }
            ClassificationResult::DetachedAccount => {
                self.removal.try_to_mark_detached(num, false)
            }
            ClassificationResult::DetachedContract => {
                self.removal.try_to_mark_detached(num, true)
            }
            ClassificationResult::DetachedAccountGracePeriodOver => {
                self.removal.try_to_remove_account(num)
            }
            ClassificationResult::DetachedContractGracePeriodOver => {
                self.removal.try_to_remove_contract(num)
            }
            ClassificationResult::ExpiredAccountReadyToRenew => {
                self.renewal.try_to_renew_account(num, now)
            }
            ClassificationResult::ExpiredContractReadyToRenew => {
                self.renewal.try_to_renew_contract(num, now)
            }
        }
    }
}
