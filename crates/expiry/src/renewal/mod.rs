//! Auto-renewal of expired, funded entities.
//!
//! Renewal assesses a fee against the designated payer, extends the entity's
//! expiration by the granted period, charges the fee, distributes it to the
//! network's collection accounts, and streams a renewal record.

mod charging;
mod fees;
mod helper;

pub use charging::{FeeDistributing, FeeDistribution, NonHapiFeeCharging};
pub use fees::{FeeCalculator, UsagePricedFees};
pub use helper::{RenewalHelper, RenewalWork};
