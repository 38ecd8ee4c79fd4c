use super::{
    deposit_data, LedgerContext, DEPOSIT, LEGACY_DEPOSIT, POV_GATED, TAMPERING_DEPOSIT,
};
use crate::{LedgerConstants, ProcessResult, DEV_GENESIS_ACCOUNT};
use rsdag_core::{work::WorkThresholds, Account, Amount, PendingInfo, PendingKey, StateBlock};
use rsdag_store_lmdb::LmdbContractStore;
use std::sync::atomic::Ordering;
use tracing_test::traced_test;

fn deposit(ctx: &LedgerContext, contract: Account, payload: &[u8]) -> anyhow::Result<StateBlock> {
    Ok(ctx
        .genesis_block_factory()
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            contract,
            Amount::raw(1000),
            deposit_data(payload),
        )
        .build())
}

#[test]
fn contract_send_creates_pending_entry() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;

    assert_eq!(ctx.process(&send), ProcessResult::Progress);

    let txn = ctx.ledger.store.tx_begin_read()?;
    assert_eq!(
        ctx.ledger
            .pending_info(&txn, &PendingKey::new(*DEV_GENESIS_ACCOUNT, send.hash()))?,
        Some(PendingInfo::new(
            *DEV_GENESIS_ACCOUNT,
            ctx.ledger.constants.chain_token,
            Amount::raw(1000)
        ))
    );
    assert_eq!(
        ctx.chain_balance(&DEV_GENESIS_ACCOUNT),
        ctx.ledger.constants.genesis_amount - Amount::raw(1000)
    );
    Ok(())
}

#[test]
fn contract_send_persists_contract_storage() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;
    ctx.process_ok(&send);

    let txn = ctx.ledger.store.tx_begin_read()?;
    let key = LmdbContractStore::storage_key(DEPOSIT.as_bytes(), b"last");
    assert_eq!(
        ctx.ledger.store.contract.get(&txn, &key)?,
        Some(send.data().to_vec())
    );
    Ok(())
}

#[test]
fn contract_reward_pays_back() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let genesis = ctx.genesis_block_factory();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;
    ctx.process_ok(&send);
    let reward = genesis
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();

    assert_eq!(ctx.process(&reward), ProcessResult::Progress);

    let txn = ctx.ledger.store.tx_begin_read()?;
    assert_eq!(
        ctx.chain_balance(&DEV_GENESIS_ACCOUNT),
        ctx.ledger.constants.genesis_amount
    );
    assert!(ctx
        .ledger
        .pending_for(&txn, &DEV_GENESIS_ACCOUNT)?
        .is_empty());
    assert_eq!(genesis.info(&txn).unwrap().block_count, 3);
    Ok(())
}

#[test]
fn contract_reward_only_once() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let genesis = ctx.genesis_block_factory();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;
    ctx.process_ok(&send);
    let reward = genesis
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();
    ctx.process_ok(&reward);

    let again = genesis
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();
    assert_eq!(ctx.process(&again), ProcessResult::UnReceivable);
    Ok(())
}

#[test]
fn contract_reward_with_other_data_is_invalid() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;
    ctx.process_ok(&send);
    let reward = ctx
        .genesis_block_factory()
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .data(deposit_data(b"world"))
        .build();

    assert_eq!(ctx.process(&reward), ProcessResult::InvalidData);
    Ok(())
}

#[test]
fn contract_reward_with_other_amount_is_invalid() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *DEPOSIT, b"hello")?;
    ctx.process_ok(&send);
    let reward = ctx
        .genesis_block_factory()
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .balance(ctx.ledger.constants.genesis_amount - Amount::raw(1))
        .build();

    assert_eq!(ctx.process(&reward), ProcessResult::InvalidData);
    Ok(())
}

#[test]
#[traced_test]
fn tampered_send_data_is_invalid() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *TAMPERING_DEPOSIT, b"hello")?;

    assert_eq!(ctx.process(&send), ProcessResult::InvalidData);
    assert!(logs_contain("contract send data does not match"));
    assert!(!ctx
        .ledger
        .block_exists(&ctx.ledger.store.tx_begin_read()?, &send.hash())?);
    Ok(())
}

#[test]
fn contract_send_with_overflowing_benefit_is_balance_mismatch() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = ctx
        .genesis_block_factory()
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *DEPOSIT,
            Amount::raw(1000),
            deposit_data(b"hello"),
        )
        .balance(Amount::MAX)
        .vote(Amount::raw(1))
        .build();
    let count = ctx.block_count();

    assert_eq!(ctx.ledger.process_block(&send)?, ProcessResult::BalanceMismatch);
    assert_eq!(ctx.block_count(), count);
    assert_eq!(
        ctx.chain_balance(&DEV_GENESIS_ACCOUNT),
        ctx.ledger.constants.genesis_amount
    );
    Ok(())
}

#[test]
fn send_to_unknown_contract_is_gap() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, Account::from(999), b"hello")?;

    assert_eq!(ctx.process(&send), ProcessResult::GapSmartContract);
    Ok(())
}

#[test]
fn unknown_method_is_hard_error() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = ctx
        .genesis_block_factory()
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *DEPOSIT,
            Amount::raw(1),
            vec![1, 2, 3, 4],
        )
        .build();

    assert!(ctx.ledger.process_block(&send).is_err());
    assert!(!ctx
        .ledger
        .block_exists(&ctx.ledger.store.tx_begin_read()?, &send.hash())?);
    Ok(())
}

#[test]
fn missing_storage_of_legacy_contract_is_token_info_gap() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = deposit(&ctx, *LEGACY_DEPOSIT, b"hello")?;
    ctx.process_ok(&send);
    let reward = ctx
        .genesis_block_factory()
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();

    assert_eq!(ctx.process(&reward), ProcessResult::GapTokenInfo);
    Ok(())
}

#[test]
fn pov_gated_send_waits_for_height() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let send = ctx
        .genesis_block_factory()
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *POV_GATED,
            Amount::raw(10),
            deposit_data(b"pov"),
        )
        .pov_height(10)
        .build();

    assert_eq!(ctx.process(&send), ProcessResult::GapPovHeight);
    ctx.contracts.reached_height.store(10, Ordering::SeqCst);
    assert_eq!(ctx.process(&send), ProcessResult::Progress);
    Ok(())
}

#[test]
fn sends_to_no_sign_contracts_skip_signature() -> anyhow::Result<()> {
    let mut constants = LedgerConstants::unit_test();
    constants.no_sign_addresses.push(*DEPOSIT);
    let ctx = LedgerContext::with_constants(constants);
    let send = ctx
        .genesis_block_factory()
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *DEPOSIT,
            Amount::raw(10),
            deposit_data(b"unsigned"),
        )
        .sign_zero()
        .build();

    assert_eq!(ctx.process(&send), ProcessResult::Progress);
    Ok(())
}

#[test]
fn insufficient_work_is_rejected() -> anyhow::Result<()> {
    let ctx = LedgerContext::with_constants(LedgerConstants::new(
        WorkThresholds::new(u64::MAX),
        *DEV_GENESIS_ACCOUNT,
    ));
    let send = ctx
        .genesis_block_factory()
        .send(&ctx.ledger.store.tx_begin_read()?)
        .build();

    assert_eq!(ctx.process(&send), ProcessResult::BadWork);
    Ok(())
}
