use expiry_primitives::{ExpirableAccount, Timestamp};
use renewal_fees::{assess_renewal, ExchangeRate, RenewAssessment, RenewalPriceParams};
use std::sync::{Arc, RwLock};

/// Assesses renewal fees for expired entities.
pub trait FeeCalculator {
    /// The fee and granted period for renewing `entity` at `now`, paid by
    /// `payer`.
    fn assess_crypto_auto_renewal(
        &self,
        entity: &ExpirableAccount,
        requested_period: i64,
        now: Timestamp,
        payer: &ExpirableAccount,
    ) -> RenewAssessment;
}

impl<T: FeeCalculator> FeeCalculator for Arc<RwLock<T>> {
    fn assess_crypto_auto_renewal(
        &self,
        entity: &ExpirableAccount,
        requested_period: i64,
        now: Timestamp,
        payer: &ExpirableAccount,
    ) -> RenewAssessment {
        self.read().expect("fee calculator lock poisoned").assess_crypto_auto_renewal(
            entity,
            requested_period,
            now,
            payer,
        )
    }
}

/// [`FeeCalculator`] backed by the usage-priced renewal schedule.
#[derive(Debug, Clone)]
pub struct UsagePricedFees {
    prices: RenewalPriceParams,
    rate: ExchangeRate,
}

impl UsagePricedFees {
    /// Builds a calculator from the configured price schedule and rate.
    pub const fn new(prices: RenewalPriceParams, rate: ExchangeRate) -> Self {
        Self { prices, rate }
    }
}

impl FeeCalculator for UsagePricedFees {
    fn assess_crypto_auto_renewal(
        &self,
        entity: &ExpirableAccount,
        requested_period: i64,
        _now: Timestamp,
        payer: &ExpirableAccount,
    ) -> RenewAssessment {
        assess_renewal(
            &self.prices,
            self.rate,
            entity.is_contract,
            entity.num_kv_pairs,
            requested_period,
            payer.balance,
        )
    }
}
