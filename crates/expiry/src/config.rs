use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default grace period between expiry and removal eligibility (one week).
pub const DEFAULT_GRACE_PERIOD_SECS: i64 = 604_800;

/// Default bound on treasury-return units processed per GC touch.
pub const DEFAULT_MAX_RETURNED_UNITS_PER_TOUCH: usize = 10;

/// Errors raised while reading expiry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The chainspec extras had no expiry section.
    #[error("missing expiry config in chainspec extras")]
    Missing,
    /// The expiry section did not deserialize.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Immutable snapshot of the dynamic properties the expiry pipeline consults.
///
/// Captured once at construction so a mid-round properties reload cannot
/// change dispatch decisions between classification and work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiryConfig {
    /// Whether expired plain accounts are auto-renewed (and, past grace,
    /// removed).
    #[serde(default = "default_enabled", rename = "autoRenew")]
    pub auto_renew_enabled: bool,
    /// Whether expired contracts are auto-renewed (and, past grace, removed).
    #[serde(default = "default_enabled", rename = "contractAutoRenew")]
    pub contract_auto_renew_enabled: bool,
    /// Seconds after expiry during which a broke entity is only detached,
    /// never removed.
    #[serde(default = "default_grace_period", rename = "gracePeriodSecs")]
    pub grace_period_secs: i64,
    /// Upper bound on token relationships / NFTs returned in one GC touch.
    #[serde(default = "default_max_returned_units", rename = "maxReturnedUnitsPerTouch")]
    pub max_returned_units_per_touch: usize,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            auto_renew_enabled: true,
            contract_auto_renew_enabled: true,
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            max_returned_units_per_touch: DEFAULT_MAX_RETURNED_UNITS_PER_TOUCH,
        }
    }
}

impl ExpiryConfig {
    /// Whether auto-renewal work is enabled for the given entity type.
    pub const fn is_auto_renew_enabled_for(&self, is_contract: bool) -> bool {
        if is_contract {
            self.contract_auto_renew_enabled
        } else {
            self.auto_renew_enabled
        }
    }
}

/// Reads `ledger.expiry` from a chainspec/extras JSON blob.
///
/// Expected shape (example):
/// {
///   "ledger": {
///     "expiry": {
///       "autoRenew": true,
///       "contractAutoRenew": true,
///       "gracePeriodSecs": 604800,
///       "maxReturnedUnitsPerTouch": 10
///     }
///   }
/// }
pub fn parse_expiry_config(extras: &Value) -> Result<ExpiryConfig, ConfigError> {
    let ledger = extras.get("ledger").ok_or(ConfigError::Missing)?;
    let expiry = ledger.get("expiry").ok_or(ConfigError::Missing)?;
    serde_json::from_value::<ExpiryConfig>(expiry.clone())
        .map_err(|e| ConfigError::Invalid(e.to_string()))
}

const fn default_enabled() -> bool {
    true
}

const fn default_grace_period() -> i64 {
    DEFAULT_GRACE_PERIOD_SECS
}

const fn default_max_returned_units() -> usize {
    DEFAULT_MAX_RETURNED_UNITS_PER_TOUCH
}
