use super::LedgerContext;
use crate::ProcessResult;
use rsdag_core::{Amount, BlockHash, Frontier, PendingKey};

#[test]
fn open_consumes_pending_entry() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    ctx.process_ok(&send);
    let open = destination
        .open(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::Progress);

    let txn = ctx.ledger.store.tx_begin_read()?;
    let info = destination.info(&txn).unwrap();
    assert_eq!(info.balance, Amount::raw(300));
    assert_eq!(info.open_block, open.hash());
    assert_eq!(info.block_count, 1);
    assert_eq!(info.belong_to, destination.account());
    assert_eq!(
        ctx.ledger
            .pending_info(&txn, &PendingKey::new(destination.account(), send.hash()))?,
        None
    );
    assert_eq!(
        ctx.ledger.frontier(&txn, &open.hash())?,
        Some(Frontier::new(open.hash(), open.hash()))
    );
    assert_eq!(
        ctx.ledger
            .representation(&txn, &destination.account())?
            .total,
        Amount::raw(300)
    );
    Ok(())
}

#[test]
fn open_with_wrong_amount_is_mismatch() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    ctx.process_ok(&send);
    let open = destination
        .open(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .balance(Amount::raw(301))
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::BalanceMismatch);
    Ok(())
}

#[test]
fn open_with_benefit_components_is_mismatch() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    ctx.process_ok(&send);
    let open = destination
        .open(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .oracle(Amount::raw(1))
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::BalanceMismatch);
    Ok(())
}

#[test]
fn open_of_send_to_other_account_is_unreceivable() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send(&ctx.ledger.store.tx_begin_read()?)
        .build();
    ctx.process_ok(&send);
    let open = destination
        .open(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::UnReceivable);
    Ok(())
}

#[test]
fn open_of_unknown_source_is_gap() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let open = ctx
        .block_factory()
        .open(&ctx.ledger.store.tx_begin_read()?, *crate::DEV_GENESIS_HASH)
        .link(BlockHash::from(42))
        .balance(Amount::raw(1))
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::GapSource);
    Ok(())
}

#[test]
fn second_open_is_fork() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    ctx.process_ok(&send);
    let txn = ctx.ledger.store.tx_begin_read()?;
    let open1 = destination.open(&txn, send.hash()).build();
    let open2 = destination
        .open(&txn, send.hash())
        .representative(rsdag_core::Account::from(9))
        .build();
    drop(txn);

    ctx.process_ok(&open1);
    assert_eq!(ctx.process(&open2), ProcessResult::Fork);
    Ok(())
}

#[test]
fn open_with_previous_is_rejected() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let open = ctx
        .block_factory()
        .open(&ctx.ledger.store.tx_begin_read()?, *crate::DEV_GENESIS_HASH)
        .previous(*crate::DEV_GENESIS_HASH)
        .build();

    assert_eq!(ctx.process(&open), ProcessResult::Other);
    Ok(())
}
