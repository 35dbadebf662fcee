use crate::state::LedgerError;
use thiserror::Error;

/// Failures that abort a `process` call and surface to the scheduler.
///
/// Ordinary "can't do it right now" conditions are never errors; they are
/// [`crate::SystemTaskResult`] values. Only genuine state inconsistencies
/// (a classified entity vanishing mid-tick, an unfunded charge) land here.
#[derive(Debug, Error)]
pub enum ExpiryError {
    /// A ledger-state operation failed.
    #[error("ledger state error: {0}")]
    Ledger(#[from] LedgerError),
}
