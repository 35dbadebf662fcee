use crate::types::{ExchangeRate, RenewAssessment, RenewalPriceParams};

/// Seconds per charged hour of renewed lifetime.
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Converts a nominal tinycent fee to tinybars at the active rate.
#[inline]
pub const fn tinybars_from_tinycents(rate: ExchangeRate, tinycents: u64) -> u64 {
    tinycents * rate.hbar_equiv as u64 / rate.cent_equiv as u64
}

/// The hourly renewal price in tinycents for an entity of the given shape.
///
/// Contracts pay a storage surcharge for each key/value pair beyond the free
/// tier; plain accounts and in-tier contracts pay the flat hourly price.
#[inline]
pub fn hourly_price_tinycents(
    params: &RenewalPriceParams,
    is_contract: bool,
    kv_pairs_used: u64,
) -> u64 {
    if !is_contract {
        return params.account_price_tinycents_per_hour;
    }
    let over_tier = kv_pairs_used.saturating_sub(params.free_tier_kv_pairs);
    params
        .contract_price_tinycents_per_hour
        .saturating_add(over_tier.saturating_mul(params.storage_slot_price_tinycents_per_hour))
}

/// Assesses the fee and granted period for one renewal attempt.
///
/// A broke payer gets [`RenewAssessment::ZERO`]. Otherwise the requested
/// period is charged by the (rounded-up) hour, and capped to the hours the
/// payer's balance can cover; a payer that cannot afford even one hour is
/// granted a single hour for its remaining balance.
pub fn assess_renewal(
    params: &RenewalPriceParams,
    rate: ExchangeRate,
    is_contract: bool,
    kv_pairs_used: u64,
    requested_period_secs: i64,
    payer_balance: i64,
) -> RenewAssessment {
    if payer_balance <= 0 || requested_period_secs <= 0 {
        return RenewAssessment::ZERO;
    }

    let hourly_tinycents = hourly_price_tinycents(params, is_contract, kv_pairs_used);
    let hourly_tinybars = tinybars_from_tinycents(rate, hourly_tinycents).max(1) as i64;

    let requested_hours = (requested_period_secs + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR;
    let affordable_hours = payer_balance / hourly_tinybars;

    if affordable_hours >= requested_hours {
        RenewAssessment {
            fee: hourly_tinybars * requested_hours,
            renewal_period: requested_period_secs,
        }
    } else if affordable_hours > 0 {
        RenewAssessment {
            fee: hourly_tinybars * affordable_hours,
            renewal_period: affordable_hours * SECONDS_PER_HOUR,
        }
    } else {
        // Less than an hour's fee left; take it all for a single hour.
        RenewAssessment { fee: payer_balance, renewal_period: SECONDS_PER_HOUR }
    }
}
