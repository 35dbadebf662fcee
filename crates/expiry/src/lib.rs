//! Entity expiry, auto-renewal, and removal
//!
//! This crate provides the per-entity expiry pipeline a ledger node runs once
//! per candidate entity per consensus round:
//! - Classification of an entity's expiry status
//! - Auto-renewal of funded expired entities (fee assessment, charging, and
//!   distribution)
//! - Garbage collection of detached entities past their grace period
//!   (treasury returns, contract storage purging)
//! - The [`ExpiryProcess`] orchestrator tying the above together under a
//!   consensus-time budget and a map-access throttle

/// Expiry classification of entities.
pub mod classify;

/// Configuration for the expiry pipeline.
pub mod config;

/// Error types surfaced to the scheduler.
pub mod error;

/// The per-round expiry orchestrator.
pub mod process;

/// Synthetic record construction for renewal and removal steps.
pub mod records;

/// Garbage collection of detached entities.
pub mod removal;

/// Auto-renewal of expired entities.
pub mod renewal;

/// The ledger-state seam the pipeline operates through.
pub mod state;

/// Pipeline counters.
pub mod stats;

/// Capacity throttling for state-map accesses.
pub mod throttle;


// Re-export public types
pub use classify::{ClassificationResult, ClassificationWork, Classifier};
pub use config::{parse_expiry_config, ConfigError, ExpiryConfig};
pub use error::ExpiryError;
pub use process::{ExpiryProcess, SystemTaskResult};
pub use records::{
    ConsensusTimeTracker, ExpiryRecord, ExpiryRecordStreaming, ExpiryRecordsHelper,
    RecordBudgetTracker, RecordSink,
};
pub use removal::{
    AccountGc, ContractGc, CryptoGcOutcome, FungibleTreasuryReturns, NonFungibleTreasuryReturns,
    RemovalHelper, RemovalWork, StateAccountGc, StateContractGc, TreasuryReturnHelper,
};
pub use renewal::{
    FeeCalculator, FeeDistributing, FeeDistribution, NonHapiFeeCharging, RenewalHelper,
    RenewalWork, UsagePricedFees,
};
pub use state::{LedgerError, LedgerState, SharedState, TokenRel, UniqueNft};
pub use stats::{ExpiryStats, SharedStats};
pub use throttle::{ExpiryThrottle, MapAccessType, SharedThrottle};
