use super::{deposit_data, LedgerContext, DEPOSIT, LEGACY_DEPOSIT, POV_GATED};
use crate::{ProcessResult, UncheckedBlockResolver, DEV_GENESIS_ACCOUNT};
use rsdag_core::{Amount, BlockHash, BlockType, SynchronizedKind, UncheckedKind};
use rsdag_store_lmdb::LmdbContractStore;
use std::sync::{atomic::Ordering, Arc};
use tracing_test::traced_test;

fn resolver(ctx: &LedgerContext) -> UncheckedBlockResolver {
    UncheckedBlockResolver::new(Arc::clone(&ctx.ledger))
}

fn unchecked_count(ctx: &LedgerContext) -> u64 {
    let txn = ctx.ledger.store.tx_begin_read().unwrap();
    ctx.ledger.store.unchecked.count(&txn).unwrap()
}

#[test]
fn chain_is_resolved_once_its_first_block_arrives() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let genesis = ctx.genesis_block_factory();
    let destination = ctx.block_factory().account();
    let send1 = genesis
        .send_to(&ctx.ledger.store.tx_begin_read()?, destination, Amount::raw(10))
        .build();
    let send2 = genesis
        .send_after(&send1, destination, Amount::raw(20))
        .build();
    let send3 = genesis
        .send_after(&send2, destination, Amount::raw(30))
        .build();

    assert_eq!(
        resolver.process(&send3, SynchronizedKind::Sync)?,
        ProcessResult::GapPrevious
    );
    assert_eq!(
        resolver.process(&send2, SynchronizedKind::Sync)?,
        ProcessResult::GapPrevious
    );
    assert_eq!(unchecked_count(&ctx), 2);

    let tracker = ctx.ledger.track_processed();
    assert_eq!(
        resolver.process(&send1, SynchronizedKind::Sync)?,
        ProcessResult::Progress
    );

    assert_eq!(
        tracker.output(),
        vec![
            (send1.hash(), ProcessResult::Progress),
            (send2.hash(), ProcessResult::Progress),
            (send3.hash(), ProcessResult::Progress),
        ]
    );
    let txn = ctx.ledger.store.tx_begin_read()?;
    assert_eq!(genesis.info(&txn).unwrap().header, send3.hash());
    assert_eq!(unchecked_count(&ctx), 0);
    Ok(())
}

#[test]
fn open_waits_for_its_source() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    let open = destination
        .open_with_amount(send.hash(), Amount::raw(300))
        .build();

    assert_eq!(
        resolver.process(&open, SynchronizedKind::Local)?,
        ProcessResult::GapSource
    );
    {
        let txn = ctx.ledger.store.tx_begin_read()?;
        assert!(ctx
            .ledger
            .store
            .unchecked
            .exists(&txn, &send.hash(), UncheckedKind::Link)?);
    }

    assert_eq!(
        resolver.process(&send, SynchronizedKind::Local)?,
        ProcessResult::Progress
    );

    assert_eq!(ctx.chain_balance(&destination.account()), Amount::raw(300));
    assert_eq!(unchecked_count(&ctx), 0);
    Ok(())
}

#[test]
fn receive_waits_for_its_send() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let genesis = ctx.genesis_block_factory();
    let destination = ctx.block_factory();
    let first = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(100),
        )
        .build();
    ctx.process_ok(&first);
    let open = destination
        .open(&ctx.ledger.store.tx_begin_read()?, first.hash())
        .build();
    ctx.process_ok(&open);

    let second = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(200),
        )
        .build();
    let receive = destination
        .receive_with_amount(
            &ctx.ledger.store.tx_begin_read()?,
            second.hash(),
            Amount::raw(200),
        )
        .build();

    assert_eq!(
        resolver.process(&receive, SynchronizedKind::Sync)?,
        ProcessResult::GapSource
    );
    let mut parked = Vec::new();
    ctx.ledger
        .store
        .unchecked
        .walk(&ctx.ledger.store.tx_begin_read()?, &mut |info, dependency, kind| {
            parked.push((info.block.hash(), dependency, kind));
            Ok(())
        })?;
    assert_eq!(
        parked,
        vec![(receive.hash(), second.hash(), UncheckedKind::Link)]
    );

    resolver.process(&second, SynchronizedKind::Sync)?;

    let txn = ctx.ledger.store.tx_begin_read()?;
    assert_eq!(destination.info(&txn).unwrap().header, receive.hash());
    assert_eq!(ctx.chain_balance(&destination.account()), Amount::raw(300));
    Ok(())
}

#[test]
fn dependency_slot_holds_one_block() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let genesis = ctx.genesis_block_factory();
    let send1 = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            *DEV_GENESIS_ACCOUNT,
            Amount::raw(1),
        )
        .build();
    let send2 = genesis
        .send_after(&send1, *DEV_GENESIS_ACCOUNT, Amount::raw(1))
        .build();
    let competing = genesis
        .send_after(&send1, *DEV_GENESIS_ACCOUNT, Amount::raw(2))
        .build();

    let mut txn = ctx.ledger.store.tx_begin_write()?;
    assert!(resolver.add(&mut txn, &send2, ProcessResult::GapPrevious, SynchronizedKind::Local)?);
    assert!(!resolver.add(
        &mut txn,
        &competing,
        ProcessResult::GapPrevious,
        SynchronizedKind::Local
    )?);
    assert!(!resolver.add(&mut txn, &send2, ProcessResult::Fork, SynchronizedKind::Local)?);
    txn.commit()?;

    assert_eq!(unchecked_count(&ctx), 1);
    Ok(())
}

#[test]
#[traced_test]
fn invalid_unchecked_block_is_dropped() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let destination = ctx.block_factory();
    let send = ctx
        .genesis_block_factory()
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    let open = destination
        .open_with_amount(send.hash(), Amount::raw(1))
        .build();
    resolver.process(&open, SynchronizedKind::Local)?;

    let processed = resolver.block_arrived(&send.hash())?;
    // the send itself was never processed, so the open still misses its source
    assert_eq!(processed, vec![(open.hash(), ProcessResult::GapSource)]);

    resolver.process(&send, SynchronizedKind::Local)?;

    assert!(logs_contain("dropping unchecked block"));
    assert_eq!(unchecked_count(&ctx), 0);
    assert_eq!(destination.info(&ctx.ledger.store.tx_begin_read()?), None);
    Ok(())
}

#[test]
#[traced_test]
fn failing_unchecked_block_does_not_stall_its_siblings() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let genesis = ctx.genesis_block_factory();
    let destination = ctx.block_factory();
    let send = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            destination.account(),
            Amount::raw(300),
        )
        .build();
    let broken = genesis
        .send_after(&send, *DEPOSIT, Amount::raw(1))
        .block_type(BlockType::ContractSend)
        .data(vec![1, 2, 3, 4])
        .build();
    let open = destination
        .open_with_amount(send.hash(), Amount::raw(300))
        .build();

    assert_eq!(
        resolver.process(&broken, SynchronizedKind::Sync)?,
        ProcessResult::GapPrevious
    );
    assert_eq!(
        resolver.process(&open, SynchronizedKind::Sync)?,
        ProcessResult::GapSource
    );
    assert_eq!(unchecked_count(&ctx), 2);

    let tracker = ctx.ledger.track_processed();
    assert_eq!(
        resolver.process(&send, SynchronizedKind::Sync)?,
        ProcessResult::Progress
    );

    assert!(logs_contain("dropping unchecked block"));
    assert_eq!(
        tracker.output(),
        vec![
            (send.hash(), ProcessResult::Progress),
            (open.hash(), ProcessResult::Progress),
        ]
    );
    let txn = ctx.ledger.store.tx_begin_read()?;
    assert_eq!(destination.info(&txn).unwrap().header, open.hash());
    assert!(!ctx.ledger.block_exists(&txn, &broken.hash())?);
    assert_eq!(unchecked_count(&ctx), 0);
    Ok(())
}

#[test]
fn pov_gated_send_is_resubmitted_at_height() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
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

    assert_eq!(
        resolver.process(&send, SynchronizedKind::Sync)?,
        ProcessResult::GapPovHeight
    );
    assert_eq!(
        resolver.pov_height_arrived(10)?,
        vec![(send.hash(), ProcessResult::GapPovHeight)]
    );
    assert_eq!(unchecked_count(&ctx), 1);

    ctx.contracts.reached_height.store(10, Ordering::SeqCst);
    assert_eq!(resolver.pov_height_arrived(9)?, vec![]);
    assert_eq!(
        resolver.pov_height_arrived(10)?,
        vec![(send.hash(), ProcessResult::Progress)]
    );
    assert_eq!(unchecked_count(&ctx), 0);
    Ok(())
}

#[test]
fn reward_waits_for_token_info() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let resolver = resolver(&ctx);
    let genesis = ctx.genesis_block_factory();
    let send = genesis
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *LEGACY_DEPOSIT,
            Amount::raw(1000),
            deposit_data(b"legacy"),
        )
        .build();
    ctx.process_ok(&send);
    let reward = genesis
        .contract_reward(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();

    assert_eq!(
        resolver.process(&reward, SynchronizedKind::Sync)?,
        ProcessResult::GapTokenInfo
    );
    {
        let txn = ctx.ledger.store.tx_begin_read()?;
        let token = BlockHash::from_bytes(*ctx.ledger.constants.chain_token.as_bytes());
        assert!(ctx
            .ledger
            .store
            .unchecked
            .exists(&txn, &token, UncheckedKind::TokenInfo)?);
    }

    {
        let mut txn = ctx.ledger.store.tx_begin_write()?;
        let key = LmdbContractStore::storage_key(LEGACY_DEPOSIT.as_bytes(), b"last");
        ctx.ledger.store.contract.put(&mut txn, &key, send.data())?;
        txn.commit()?;
    }

    assert_eq!(
        resolver.token_info_arrived(&ctx.ledger.constants.chain_token)?,
        vec![(reward.hash(), ProcessResult::Progress)]
    );
    assert_eq!(
        ctx.chain_balance(&DEV_GENESIS_ACCOUNT),
        ctx.ledger.constants.genesis_amount
    );
    Ok(())
}
