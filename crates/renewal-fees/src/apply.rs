use crate::types::FeeDistributionParams;
use expiry_primitives::EntityNum;

/// Produces the balance credits that distribute one charged fee.
/// The caller applies these to ledger state after debiting the payer.
pub fn credit_plan(params: &FeeDistributionParams, fee: i64) -> Vec<(EntityNum, i64)> {
    let mut v = Vec::with_capacity(3);
    let node_share = fee * params.node_reward_percent as i64 / 100;
    let staking_share = fee * params.staking_reward_percent as i64 / 100;
    let funding_share = fee - node_share - staking_share;
    if node_share != 0 {
        v.push((params.node_reward_account, node_share));
    }
    if staking_share != 0 {
        v.push((params.staking_reward_account, staking_share));
    }
    if funding_share != 0 {
        v.push((params.funding_account, funding_share));
    }
    v
}
