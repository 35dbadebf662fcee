use expiry_primitives::EntityNum;
use serde::{Deserialize, Serialize};

/// Fee and granted period computed for one renewal attempt.
///
/// The granted period never exceeds what the payer's balance can afford, so
/// it may be shorter than the period the entity requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewAssessment {
    /// Fee to charge, in tinybars.
    pub fee: i64,
    /// Granted renewal period, in seconds.
    pub renewal_period: i64,
}

impl RenewAssessment {
    /// The assessment for an entity that cannot pay anything.
    pub const ZERO: Self = Self { fee: 0, renewal_period: 0 };
}

// Renewal prices are quoted in tinycents per hour of extended lifetime, with
// a storage surcharge for contracts holding state beyond the free tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalPriceParams {
    /// Hourly renewal price for a plain account (tinycents).
    #[serde(default = "default_account_price")]
    pub account_price_tinycents_per_hour: u64,
    /// Hourly renewal price for a contract (tinycents).
    #[serde(default = "default_contract_price")]
    pub contract_price_tinycents_per_hour: u64,
    /// Hourly surcharge per storage slot beyond the free tier (tinycents).
    #[serde(default = "default_storage_slot_price")]
    pub storage_slot_price_tinycents_per_hour: u64,
    /// Contract storage slots exempt from the surcharge.
    #[serde(default = "default_free_tier_kv_pairs")]
    pub free_tier_kv_pairs: u64,
}

impl Default for RenewalPriceParams {
    fn default() -> Self {
        Self {
            account_price_tinycents_per_hour: default_account_price(),
            contract_price_tinycents_per_hour: default_contract_price(),
            storage_slot_price_tinycents_per_hour: default_storage_slot_price(),
            free_tier_kv_pairs: default_free_tier_kv_pairs(),
        }
    }
}

/// Active hbar/cent exchange rate used to convert nominal fees to tinybars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Hbar side of the rate.
    #[serde(default = "default_hbar_equiv")]
    pub hbar_equiv: u32,
    /// Cent side of the rate.
    #[serde(default = "default_cent_equiv")]
    pub cent_equiv: u32,
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self { hbar_equiv: default_hbar_equiv(), cent_equiv: default_cent_equiv() }
    }
}

/// Where charged renewal fees go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDistributionParams {
    /// The network funding account; collects whatever the reward accounts
    /// don't.
    #[serde(default = "default_funding_account")]
    pub funding_account: EntityNum,
    /// Account accruing staking rewards.
    #[serde(default = "default_staking_reward_account")]
    pub staking_reward_account: EntityNum,
    /// Account accruing node rewards.
    #[serde(default = "default_node_reward_account")]
    pub node_reward_account: EntityNum,
    /// Percentage of each fee routed to staking rewards.
    #[serde(default)]
    pub staking_reward_percent: u32,
    /// Percentage of each fee routed to node rewards.
    #[serde(default)]
    pub node_reward_percent: u32,
}

impl Default for FeeDistributionParams {
    fn default() -> Self {
        Self {
            funding_account: default_funding_account(),
            staking_reward_account: default_staking_reward_account(),
            node_reward_account: default_node_reward_account(),
            staking_reward_percent: 0,
            node_reward_percent: 0,
        }
    }
}

/// Everything the renewal fee pipeline needs from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenewalFeesConfig {
    /// Renewal price schedule.
    #[serde(default)]
    pub prices: RenewalPriceParams,
    /// Active exchange rate.
    #[serde(default)]
    pub rate: ExchangeRate,
    /// Fee distribution targets and splits.
    #[serde(default)]
    pub distribution: FeeDistributionParams,
}

const fn default_account_price() -> u64 { 2_200_000 }
const fn default_contract_price() -> u64 { 2_600_000 }
const fn default_storage_slot_price() -> u64 { 100 }
const fn default_free_tier_kv_pairs() -> u64 { 100_000_000 }
const fn default_hbar_equiv() -> u32 { 1 }
const fn default_cent_equiv() -> u32 { 12 }
const fn default_funding_account() -> EntityNum { EntityNum::from_num(98) }
const fn default_staking_reward_account() -> EntityNum { EntityNum::from_num(800) }
const fn default_node_reward_account() -> EntityNum { EntityNum::from_num(801) }
