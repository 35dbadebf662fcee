use crate::types::RenewalFeesConfig;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing renewalFees config in chainspec extras")]
    Missing,
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Reads `ledger.renewalFees` from a chainspec/extras JSON blob.
///
/// Expected shape (example):
/// {
///   "ledger": {
///     "renewalFees": {
///       "prices": {
///         "account_price_tinycents_per_hour": 2200000,
///         "contract_price_tinycents_per_hour": 2600000,
///         "free_tier_kv_pairs": 100000000
///       },
///       "rate": { "hbar_equiv": 1, "cent_equiv": 12 },
///       "distribution": { "staking_reward_percent": 10, "node_reward_percent": 10 }
///     }
///   }
/// }
pub fn parse_renewal_fees_config(extras: &Value) -> Result<RenewalFeesConfig, ConfigError> {
    let ledger = extras.get("ledger").ok_or(ConfigError::Missing)?;
    let fees = ledger.get("renewalFees").ok_or(ConfigError::Missing)?;
    serde_json::from_value::<RenewalFeesConfig>(fees.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}
