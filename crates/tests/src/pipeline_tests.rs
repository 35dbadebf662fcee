//! Whole-pipeline scenarios driving the real components over in-memory
//! ledger state.

use crate::common::*;
use ev_expiry::{ExpiryConfig, ExpiryRecord, LedgerState, SystemTaskResult};
use expiry_primitives::{EntityNum, ExpirableAccount, NftId, Timestamp, Token, MISSING_ENTITY_ID};

const GRACE: i64 = 604_800;

#[test]
fn removes_a_detached_account_past_grace_in_one_tick() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    let mut pipeline = pipeline(ledger);

    let result = pipeline.process(1003, NOW);

    assert_eq!(SystemTaskResult::Done, result);
    assert!(pipeline.state.read().unwrap().account(EntityNum::from_num(1003)).is_none());
    let streamed = pipeline.streamed();
    assert_eq!(1, streamed.len());
    match &streamed[0] {
        ExpiryRecord::RemovalStep { entity, is_contract, finished, .. } => {
            assert_eq!(1003, entity.num);
            assert!(!*is_contract);
            assert!(*finished);
        }
        other => panic!("expected a removal step, got {other:?}"),
    }
    assert_eq!(1, pipeline.stats.read().unwrap().accounts_removed());
}

#[test]
fn needs_different_context_when_record_budget_is_exhausted() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    let mut pipeline = pipeline_with(ledger, ExpiryConfig::default(), TEST_THROTTLE_CAPACITY, 0);

    let result = pipeline.process(1003, NOW);

    assert_eq!(SystemTaskResult::NeedsDifferentContext, result);
    // Nothing was classified or touched.
    assert_eq!(TEST_THROTTLE_CAPACITY, pipeline.throttle.read().unwrap().remaining());
    assert!(pipeline.streamed().is_empty());
    assert!(pipeline.state.read().unwrap().account(EntityNum::from_num(1003)).is_some());
}

#[test]
fn record_budget_bounds_work_per_round() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    ledger.put_account(removable_account(1005, GRACE));
    let mut pipeline = pipeline_with(ledger, ExpiryConfig::default(), TEST_THROTTLE_CAPACITY, 1);

    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));
    // The only record slot is spent; the round must end here.
    assert_eq!(SystemTaskResult::NeedsDifferentContext, pipeline.process(1005, NOW));
}

#[test]
fn throttle_denial_comes_back_later_without_side_effects() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    let mut pipeline =
        pipeline_with(ledger, ExpiryConfig::default(), 0, TEST_RECORD_SLOTS);

    let result = pipeline.process(1003, NOW);

    assert_eq!(SystemTaskResult::NoCapacityLeft, result);
    assert!(pipeline.streamed().is_empty());
    assert!(pipeline.state.read().unwrap().account(EntityNum::from_num(1003)).is_some());
}

#[test]
fn unexpired_and_unknown_entities_are_nothing_to_do() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(ExpirableAccount::account(
        EntityNum::from_num(1002),
        10,
        NOW.plus_secs(1000),
    ));
    let mut pipeline = pipeline(ledger);

    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1002, NOW));
    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(4242, NOW));
    assert!(pipeline.streamed().is_empty());
}

#[test]
fn walks_an_entity_from_detachment_through_removal() {
    let num = EntityNum::from_num(1003);
    let mut ledger = InMemoryLedger::with_system_accounts();
    // Expired a second ago with nothing left to pay the renewal fee.
    ledger.put_account(ExpirableAccount::account(num, 0, NOW.plus_secs(-1)));
    let mut pipeline = pipeline(ledger);

    // First sighting: mark detached.
    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));
    assert!(pipeline.state.read().unwrap().account(num).unwrap().expired_and_pending_removal);

    // Still in grace: nothing to do.
    pipeline.begin_round();
    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1003, NOW.plus_secs(60)));
    assert!(pipeline.state.read().unwrap().account(num).is_some());

    // Grace elapsed: removed.
    pipeline.begin_round();
    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW.plus_secs(GRACE)));
    assert!(pipeline.state.read().unwrap().account(num).is_none());
}

#[test]
fn large_nft_treasury_returns_resume_across_ticks() {
    let num = EntityNum::from_num(1003);
    let treasury = EntityNum::from_num(666);
    let token = EntityNum::from_num(5678);
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    ledger.put_account(ExpirableAccount::account(treasury, 0, NOW.plus_secs(1000)));
    ledger.put_token(token, Token::non_fungible(treasury.to_entity_id()));
    ledger.put_rel(treasury, token, 0);
    ledger.chain_nfts(num, token, &[1, 2, 3, 4, 5]);

    let config = ExpiryConfig { max_returned_units_per_touch: 2, ..ExpiryConfig::default() };
    let mut pipeline = pipeline_with(ledger, config, TEST_THROTTLE_CAPACITY, TEST_RECORD_SLOTS);

    // Two serials per tick: two partial steps, then the finishing third.
    assert_eq!(SystemTaskResult::NoCapacityLeft, pipeline.process(1003, NOW));
    pipeline.begin_round();
    assert_eq!(SystemTaskResult::NoCapacityLeft, pipeline.process(1003, NOW));
    pipeline.begin_round();
    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));

    // Every partial step streamed its record.
    let streamed = pipeline.streamed();
    assert_eq!(3, streamed.len());
    let finished_flags: Vec<bool> = streamed
        .iter()
        .map(|r| match r {
            ExpiryRecord::RemovalStep { finished, .. } => *finished,
            other => panic!("expected removal steps, got {other:?}"),
        })
        .collect();
    assert_eq!(vec![false, false, true], finished_flags);

    let state = pipeline.state.read().unwrap();
    assert!(state.account(num).is_none());
    // All five NFTs now sit with the treasury.
    assert_eq!(5, state.account(treasury).unwrap().nfts_owned);
    assert_eq!(5, state.rel_balance(treasury, token));
    assert_eq!(MISSING_ENTITY_ID, state.nft(NftId::new(token, 1)).unwrap().owner);
}

#[test]
fn fungible_balances_return_to_the_treasury_ordered_by_account() {
    let num = EntityNum::from_num(1003);
    let treasury = EntityNum::from_num(666);
    let token = EntityNum::from_num(4321);
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    ledger.put_account(ExpirableAccount::account(treasury, 0, NOW.plus_secs(1000)));
    ledger.put_token(token, Token::fungible(treasury.to_entity_id()));
    ledger.put_rel(treasury, token, 100);
    ledger.put_rel(num, token, 500);
    let mut pipeline = pipeline(ledger);

    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));

    let state = pipeline.state.read().unwrap();
    assert_eq!(600, state.rel_balance(treasury, token));
    match &pipeline.streamed()[0] {
        ExpiryRecord::RemovalStep { fungible_token_types, returned_transfers, .. } => {
            assert_eq!(vec![token.to_entity_id()], *fungible_token_types);
            // Treasury 666 sorts before the expired 1003, credit first.
            assert_eq!(vec![500, -500], returned_transfers[0].amounts);
            assert_eq!(vec![666, 1003], returned_transfers[0].account_nums);
        }
        other => panic!("expected a removal step, got {other:?}"),
    }
}

#[test]
fn deleted_token_balances_burn_instead_of_returning() {
    let num = EntityNum::from_num(1003);
    let treasury = EntityNum::from_num(666);
    let token = EntityNum::from_num(4321);
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_account(1003, GRACE));
    ledger.put_account(ExpirableAccount::account(treasury, 0, NOW.plus_secs(1000)));
    let mut deleted = Token::fungible(treasury.to_entity_id());
    deleted.deleted = true;
    ledger.put_token(token, deleted);
    ledger.put_rel(num, token, 500);
    let mut pipeline = pipeline(ledger);

    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));

    match &pipeline.streamed()[0] {
        ExpiryRecord::RemovalStep { returned_transfers, .. } => {
            assert_eq!(vec![-500], returned_transfers[0].amounts);
            assert_eq!(vec![1003], returned_transfers[0].account_nums);
        }
        other => panic!("expected a removal step, got {other:?}"),
    }
}

#[test]
fn contract_removal_waits_for_storage_to_purge_across_ticks() {
    let num = EntityNum::from_num(1004);
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_contract(1004, GRACE));
    ledger.put_storage_slots(num, 25);
    let mut pipeline = pipeline(ledger);

    // Ten slots per touch: two gated ticks before the contract can go.
    assert_eq!(SystemTaskResult::NoCapacityLeft, pipeline.process(1004, NOW));
    assert!(pipeline.streamed().is_empty(), "no record until storage is purged");
    assert_eq!(15, pipeline.state.read().unwrap().num_storage_slots(num));

    pipeline.begin_round();
    assert_eq!(SystemTaskResult::NoCapacityLeft, pipeline.process(1004, NOW));

    pipeline.begin_round();
    assert_eq!(SystemTaskResult::Done, pipeline.process(1004, NOW));
    let streamed = pipeline.streamed();
    assert_eq!(1, streamed.len());
    match &streamed[0] {
        ExpiryRecord::RemovalStep { is_contract, finished, .. } => {
            assert!(*is_contract);
            assert!(*finished);
        }
        other => panic!("expected a removal step, got {other:?}"),
    }
    assert!(pipeline.state.read().unwrap().account(num).is_none());
    assert_eq!(1, pipeline.stats.read().unwrap().contracts_removed());
}

#[test]
fn treasury_of_a_live_token_is_not_removed_until_the_token_goes() {
    let num = EntityNum::from_num(1003);
    let token = EntityNum::from_num(5678);
    let mut ledger = InMemoryLedger::with_system_accounts();
    let mut treasury = removable_account(1003, GRACE);
    treasury.num_treasury_titles = 1;
    ledger.put_account(treasury);
    ledger.put_token(token, Token::fungible(num.to_entity_id()));
    ledger.put_rel(num, token, 0);
    let mut pipeline = pipeline(ledger);

    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1003, NOW));
    assert!(pipeline.state.read().unwrap().account(num).is_some());

    // Once the token is deleted the treasury is an ordinary removal target.
    {
        let mut deleted = Token::fungible(num.to_entity_id());
        deleted.deleted = true;
        pipeline.state.write().unwrap().put_token(token, deleted);
    }
    pipeline.begin_round();
    assert_eq!(SystemTaskResult::Done, pipeline.process(1003, NOW));
    assert!(pipeline.state.read().unwrap().account(num).is_none());
}

#[test]
fn renews_a_funded_expired_account_at_the_assessed_fee() {
    let num = EntityNum::from_num(1004);
    let mut ledger = InMemoryLedger::with_system_accounts();
    // One tinybar of balance: exactly one affordable hour of the 3601s it
    // asks for.
    ledger.put_account(
        ExpirableAccount::account(num, 1, NOW.plus_secs(-1)).with_auto_renew_period(3601),
    );
    let mut pipeline = pipeline(ledger);

    let result = pipeline.process(1004, NOW);

    assert_eq!(SystemTaskResult::Done, result);
    let state = pipeline.state.read().unwrap();
    assert_eq!(Timestamp::from_secs(1_238_167), state.account(num).unwrap().expiry);
    assert_eq!(0, state.balance(num));
    assert_eq!(1, state.balance(EntityNum::from_num(FUNDING_ACCOUNT)));
    assert_eq!(
        vec![ExpiryRecord::Renewal {
            entity: num.to_entity_id(),
            fee: 1,
            new_expiry: 1_238_167,
            is_contract: false,
        }],
        pipeline.streamed()
    );
    assert_eq!(1, pipeline.stats.read().unwrap().accounts_renewed());
}

#[test]
fn renews_a_contract_from_its_auto_renew_account() {
    let num = EntityNum::from_num(1004);
    let payer = EntityNum::from_num(2000);
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(
        ExpirableAccount::contract(num, 5, NOW.plus_secs(-1))
            .with_auto_renew_period(3600)
            .with_auto_renew_account(payer),
    );
    ledger.put_account(ExpirableAccount::account(payer, 1, NOW.plus_secs(1000)));
    let mut pipeline = pipeline(ledger);

    let result = pipeline.process(1004, NOW);

    assert_eq!(SystemTaskResult::Done, result);
    let state = pipeline.state.read().unwrap();
    // The designated payer funded the hour; the contract balance is intact.
    assert_eq!(5, state.balance(num));
    assert_eq!(0, state.balance(payer));
    assert_eq!(Timestamp::from_secs(1_238_167), state.account(num).unwrap().expiry);
    assert_eq!(
        vec![ExpiryRecord::Renewal {
            entity: num.to_entity_id(),
            fee: 1,
            new_expiry: 1_238_167,
            is_contract: true,
        }],
        pipeline.streamed()
    );
    assert_eq!(1, pipeline.stats.read().unwrap().contracts_renewed());
}

#[test]
fn disabled_contract_auto_renew_skips_both_renewal_and_removal() {
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(
        ExpirableAccount::contract(EntityNum::from_num(1004), 5, NOW.plus_secs(-1))
            .with_auto_renew_period(3600),
    );
    ledger.put_account(removable_contract(1005, GRACE));
    let config = ExpiryConfig { contract_auto_renew_enabled: false, ..ExpiryConfig::default() };
    let mut pipeline = pipeline_with(ledger, config, TEST_THROTTLE_CAPACITY, TEST_RECORD_SLOTS);

    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1004, NOW));
    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1005, NOW));
    assert!(pipeline.streamed().is_empty());
    assert!(pipeline.state.read().unwrap().account(EntityNum::from_num(1005)).is_some());
}

#[test]
fn pipeline_settings_parse_from_one_chainspec_extras_blob() {
    let extras = serde_json::json!({
        "ledger": {
            "expiry": {
                "contractAutoRenew": false,
                "maxReturnedUnitsPerTouch": 4
            },
            "renewalFees": {
                "prices": { "account_price_tinycents_per_hour": 1 },
                "rate": { "hbar_equiv": 1, "cent_equiv": 1 }
            }
        }
    });

    let config = ev_expiry::parse_expiry_config(&extras).unwrap();
    let fees = renewal_fees::parse_renewal_fees_config(&extras).unwrap();
    assert!(!config.contract_auto_renew_enabled);
    assert_eq!(4, config.max_returned_units_per_touch);
    assert_eq!(1, fees.prices.account_price_tinycents_per_hour);

    // A pipeline under the parsed config skips contract work entirely.
    let mut ledger = InMemoryLedger::with_system_accounts();
    ledger.put_account(removable_contract(1005, config.grace_period_secs));
    let mut pipeline = pipeline_with(ledger, config, TEST_THROTTLE_CAPACITY, TEST_RECORD_SLOTS);
    assert_eq!(SystemTaskResult::NothingToDo, pipeline.process(1005, NOW));
}
