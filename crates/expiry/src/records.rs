use crate::removal::CryptoGcOutcome;
use expiry_primitives::{CurrencyAdjustments, EntityId, EntityNum, NftAdjustments};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// A synthetic record describing one unit of expiry work, as streamed to the
/// node's record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryRecord {
    /// One best-effort step of removing an entity, with whatever treasury
    /// returns it achieved.
    RemovalStep {
        /// The entity being removed.
        entity: EntityId,
        /// Whether the entity is a contract.
        is_contract: bool,
        /// Fungible token types with returns in this step.
        fungible_token_types: Vec<EntityId>,
        /// Per-token fungible transfer lists, aligned with
        /// `fungible_token_types`.
        returned_transfers: Vec<CurrencyAdjustments>,
        /// Non-fungible token types with exchanges in this step.
        non_fungible_token_types: Vec<EntityId>,
        /// Per-token NFT exchanges, aligned with `non_fungible_token_types`.
        returned_exchanges: Vec<NftAdjustments>,
        /// Whether this step completed the removal.
        finished: bool,
    },
    /// A completed auto-renewal.
    Renewal {
        /// The renewed entity.
        entity: EntityId,
        /// Fee charged, in tinybars.
        fee: i64,
        /// The entity's new expiration, in epoch seconds.
        new_expiry: i64,
        /// Whether the entity is a contract.
        is_contract: bool,
    },
}

/// Destination for synthetic expiry records.
pub trait RecordSink {
    /// Accepts one record.
    fn publish(&mut self, record: ExpiryRecord);
}

impl<T: RecordSink> RecordSink for Arc<RwLock<T>> {
    fn publish(&mut self, record: ExpiryRecord) {
        self.write().expect("record sink lock poisoned").publish(record);
    }
}

impl RecordSink for Vec<ExpiryRecord> {
    fn publish(&mut self, record: ExpiryRecord) {
        self.push(record);
    }
}

/// The record-streaming surface the renewal and removal workers use.
pub trait ExpiryRecordStreaming {
    /// Streams the record of one removal step, finished or not.
    fn stream_crypto_removal_step(
        &mut self,
        is_contract: bool,
        num: EntityNum,
        outcome: &CryptoGcOutcome,
    );

    /// Streams the record of one completed renewal.
    fn stream_crypto_renewal(
        &mut self,
        num: EntityNum,
        fee: i64,
        new_expiry: i64,
        is_contract: bool,
    );
}

impl<T: ExpiryRecordStreaming> ExpiryRecordStreaming for Arc<RwLock<T>> {
    fn stream_crypto_removal_step(
        &mut self,
        is_contract: bool,
        num: EntityNum,
        outcome: &CryptoGcOutcome,
    ) {
        self.write()
            .expect("records helper lock poisoned")
            .stream_crypto_removal_step(is_contract, num, outcome);
    }

    fn stream_crypto_renewal(
        &mut self,
        num: EntityNum,
        fee: i64,
        new_expiry: i64,
        is_contract: bool,
    ) {
        self.write()
            .expect("records helper lock poisoned")
            .stream_crypto_renewal(num, fee, new_expiry, is_contract);
    }
}

/// Tracks the consensus-time budget for synthetic records in the current
/// round.
pub trait ConsensusTimeTracker {
    /// Whether another standalone record can still be assigned a consensus
    /// time this round.
    fn has_more_standalone_record_time(&self) -> bool;
}

/// Per-round budget of standalone record slots.
#[derive(Debug)]
pub struct RecordBudgetTracker {
    remaining: u32,
}

impl RecordBudgetTracker {
    /// A tracker with the given number of standalone record slots.
    pub const fn new(slots: u32) -> Self {
        Self { remaining: slots }
    }

    /// Consumes one slot; reports whether one was available.
    pub fn try_reserve(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    /// Refills the budget at the start of a new round.
    pub fn reset_round(&mut self, slots: u32) {
        self.remaining = slots;
    }

    /// Wraps the tracker in the shared handle the pipeline expects.
    pub fn into_shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }
}

impl ConsensusTimeTracker for Arc<RwLock<RecordBudgetTracker>> {
    fn has_more_standalone_record_time(&self) -> bool {
        self.read().expect("record budget lock poisoned").remaining > 0
    }
}

/// Builds and streams expiry records, consuming standalone record time as it
/// goes.
#[derive(Debug)]
pub struct ExpiryRecordsHelper<R> {
    sink: R,
    budget: Arc<RwLock<RecordBudgetTracker>>,
}

impl<R: RecordSink> ExpiryRecordsHelper<R> {
    /// Builds a helper over the given sink and record budget.
    pub fn new(sink: R, budget: Arc<RwLock<RecordBudgetTracker>>) -> Self {
        Self { sink, budget }
    }
}

impl<R: RecordSink> ExpiryRecordStreaming for ExpiryRecordsHelper<R> {
    fn stream_crypto_removal_step(
        &mut self,
        is_contract: bool,
        num: EntityNum,
        outcome: &CryptoGcOutcome,
    ) {
        self.budget.write().expect("record budget lock poisoned").try_reserve();
        debug!(entity = %num, is_contract, finished = outcome.finished, "streaming removal step");
        self.sink.publish(ExpiryRecord::RemovalStep {
            entity: num.to_entity_id(),
            is_contract,
            fungible_token_types: outcome.fungible.token_types.clone(),
            returned_transfers: outcome.fungible.transfers.clone(),
            non_fungible_token_types: outcome.non_fungible.token_types.clone(),
            returned_exchanges: outcome.non_fungible.exchanges.clone(),
            finished: outcome.finished,
        });
    }

    fn stream_crypto_renewal(
        &mut self,
        num: EntityNum,
        fee: i64,
        new_expiry: i64,
        is_contract: bool,
    ) {
        self.budget.write().expect("record budget lock poisoned").try_reserve();
        debug!(entity = %num, fee, new_expiry, is_contract, "streaming renewal");
        self.sink.publish(ExpiryRecord::Renewal {
            entity: num.to_entity_id(),
            fee,
            new_expiry,
            is_contract,
        });
    }
}
