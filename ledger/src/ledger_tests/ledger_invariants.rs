use super::{deposit_data, AccountBlockFactory, LedgerContext, DEPOSIT};
use crate::{DEV_GENESIS_ACCOUNT, MINTAGE_ADDRESS};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rsdag_core::{Account, Amount, Benefit, PendingKey, StateBlock};
use std::collections::{HashMap, HashSet};

/// Drives the ledger through every block type so the invariants have something to check
fn busy_ledger(ctx: &LedgerContext) -> anyhow::Result<Vec<Account>> {
    let genesis = ctx.genesis_block_factory();
    let alice = ctx.block_factory();
    let bob = ctx.block_factory();

    let send_alice = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            alice.account(),
            Amount::raw(5_000),
        )
        .build();
    ctx.process_ok(&send_alice);
    open(ctx, &alice, &send_alice)?;

    let send_bob = alice
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            bob.account(),
            Amount::raw(1_200),
        )
        .build();
    ctx.process_ok(&send_bob);
    open(ctx, &bob, &send_bob)?;

    let send_back = bob
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            alice.account(),
            Amount::raw(200),
        )
        .build();
    ctx.process_ok(&send_back);
    // stays pending
    let unreceived = genesis
        .send_to(
            &ctx.ledger.store.tx_begin_read()?,
            bob.account(),
            Amount::raw(77),
        )
        .build();
    ctx.process_ok(&unreceived);

    let receive = alice
        .receive(&ctx.ledger.store.tx_begin_read()?, send_back.hash())
        .build();
    ctx.process_ok(&receive);
    let change = genesis.change(&ctx.ledger.store.tx_begin_read()?).build();
    ctx.process_ok(&change);

    let deposit = genesis
        .contract_send(
            &ctx.ledger.store.tx_begin_read()?,
            *DEPOSIT,
            Amount::raw(10_000),
            deposit_data(b"invariant"),
        )
        .build();
    ctx.process_ok(&deposit);

    Ok(vec![
        *MINTAGE_ADDRESS,
        *DEV_GENESIS_ACCOUNT,
        alice.account(),
        bob.account(),
    ])
}

fn open(
    ctx: &LedgerContext,
    account: &AccountBlockFactory,
    send: &StateBlock,
) -> anyhow::Result<()> {
    let open = account
        .open(&ctx.ledger.store.tx_begin_read()?, send.hash())
        .build();
    ctx.process_ok(&open);
    Ok(())
}

#[test]
fn representation_is_sum_of_delegated_benefits() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let accounts = busy_ledger(&ctx)?;
    let txn = ctx.ledger.store.tx_begin_read()?;

    let mut expected: HashMap<Account, Benefit> = HashMap::new();
    for account in &accounts {
        let am = ctx.ledger.account_meta(&txn, account)?.unwrap();
        let tm = am.token(&ctx.ledger.constants.chain_token).unwrap();
        let benefit = am.coin_benefit().unwrap();
        if tm.representative.is_zero() || benefit.is_zero() {
            continue;
        }
        let entry = expected.entry(tm.representative).or_default();
        *entry = entry.checked_add(&benefit).unwrap();
    }

    assert!(!expected.is_empty());
    for (representative, benefit) in &expected {
        assert_eq!(ctx.ledger.representation(&txn, representative)?, *benefit);
    }
    // the old representative of genesis lost everything it had
    assert!(ctx
        .ledger
        .representation(&txn, &DEV_GENESIS_ACCOUNT)?
        .is_zero());
    Ok(())
}

#[test]
fn balances_and_pending_add_up_to_supply() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let accounts = busy_ledger(&ctx)?;
    let txn = ctx.ledger.store.tx_begin_read()?;

    let mut total = Amount::zero();
    for account in &accounts {
        total = total + ctx.chain_balance(account);
        for (_, info) in ctx.ledger.pending_for(&txn, account)? {
            if info.token == ctx.ledger.constants.chain_token {
                total = total + info.amount;
            }
        }
    }

    assert_eq!(total, ctx.ledger.constants.genesis_amount);
    Ok(())
}

#[test]
fn every_chain_has_exactly_one_frontier() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let accounts = busy_ledger(&ctx)?;
    let txn = ctx.ledger.store.tx_begin_read()?;

    for account in &accounts {
        let tm = ctx
            .ledger
            .token_meta(&txn, account, &ctx.ledger.constants.chain_token)?
            .unwrap();
        let frontier = ctx.ledger.frontier(&txn, &tm.header)?.unwrap();
        assert_eq!(frontier.open_block, tm.open_block);
    }
    assert_eq!(
        ctx.ledger.store.frontier.count(&txn)?,
        accounts.len() as u64
    );
    Ok(())
}

#[test]
fn block_count_matches_chain_lengths() -> anyhow::Result<()> {
    let ctx = LedgerContext::empty();
    let accounts = busy_ledger(&ctx)?;
    let txn = ctx.ledger.store.tx_begin_read()?;

    let chain_lengths: u64 = accounts
        .iter()
        .map(|account| {
            ctx.ledger
                .token_meta(&txn, account, &ctx.ledger.constants.chain_token)
                .unwrap()
                .map(|tm| tm.block_count)
                .unwrap_or_default()
        })
        .sum();
    assert_eq!(ctx.block_count(), chain_lengths);
    Ok(())
}

/// Chain token state derived from the blocks alone, without asking the ledger
#[derive(Default)]
struct ChainModel {
    heads: HashMap<Account, StateBlock>,
    pending: Vec<(usize, StateBlock)>,
    representatives: HashSet<Account>,
}

impl ChainModel {
    fn new(ctx: &LedgerContext) -> Self {
        let mut model = Self::default();
        model.apply(&ctx.ledger.constants.genesis_mintage);
        model.apply(&ctx.ledger.constants.genesis_block);
        model
    }

    fn apply(&mut self, block: &StateBlock) {
        self.representatives.insert(block.representative());
        self.heads.insert(block.address(), block.clone());
    }

    fn balance(&self, account: &Account) -> Amount {
        self.heads
            .get(account)
            .map(|head| head.balance())
            .unwrap_or_default()
    }

    fn representation(&self) -> HashMap<Account, Benefit> {
        let mut weights: HashMap<Account, Benefit> = HashMap::new();
        for head in self.heads.values() {
            let benefit = head.benefit().unwrap();
            if head.representative().is_zero() || benefit.is_zero() {
                continue;
            }
            let entry = weights.entry(head.representative()).or_default();
            *entry = entry.checked_add(&benefit).unwrap();
        }
        weights
    }
}

#[test]
fn random_block_sequences_keep_representation_consistent() -> anyhow::Result<()> {
    let representatives = [Account::from(11), Account::from(12), Account::from(13)];
    for seed in 0..4 {
        let ctx = LedgerContext::empty();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut factories = vec![ctx.genesis_block_factory()];
        factories.extend((0..4).map(|_| ctx.block_factory()));
        let mut model = ChainModel::new(&ctx);
        let supply: Amount = model
            .heads
            .values()
            .fold(Amount::zero(), |sum, head| sum + head.balance());
        let initial_count = ctx.block_count();
        let mut processed = 0;

        for _ in 0..150 {
            let txn = ctx.ledger.store.tx_begin_read()?;
            let block = match rng.gen_range(0..3) {
                0 => {
                    let sender = rng.gen_range(0..factories.len());
                    let balance = model.balance(&factories[sender].account());
                    if balance.is_zero() {
                        continue;
                    }
                    let mut destination = rng.gen_range(0..factories.len());
                    if destination == sender {
                        destination = (destination + 1) % factories.len();
                    }
                    let amount = rng.gen_range(1..=balance.number().min(1_000));
                    let send = factories[sender]
                        .send_to(
                            &txn,
                            factories[destination].account(),
                            Amount::raw(amount),
                        )
                        .build();
                    model.pending.push((destination, send.clone()));
                    send
                }
                1 => {
                    if model.pending.is_empty() {
                        continue;
                    }
                    let (destination, send) =
                        model.pending.swap_remove(rng.gen_range(0..model.pending.len()));
                    let factory = &factories[destination];
                    if model.heads.contains_key(&factory.account()) {
                        factory.receive(&txn, send.hash()).build()
                    } else {
                        factory.open(&txn, send.hash()).build()
                    }
                }
                _ => {
                    let account = rng.gen_range(0..factories.len());
                    if !model.heads.contains_key(&factories[account].account()) {
                        continue;
                    }
                    factories[account]
                        .change(&txn)
                        .representative(representatives[rng.gen_range(0..representatives.len())])
                        .build()
                }
            };
            drop(txn);
            ctx.process_ok(&block);
            model.apply(&block);
            processed += 1;
        }

        let txn = ctx.ledger.store.tx_begin_read()?;
        let expected = model.representation();
        for representative in &model.representatives {
            assert_eq!(
                ctx.ledger.representation(&txn, representative)?,
                expected.get(representative).copied().unwrap_or_default(),
                "seed {seed}, representative {representative}"
            );
        }

        let mut total = Amount::zero();
        for (account, head) in &model.heads {
            assert_eq!(ctx.chain_balance(account), head.balance(), "seed {seed}");
            total = total + head.balance();
        }
        for (destination, send) in &model.pending {
            let key = PendingKey::new(factories[*destination].account(), send.hash());
            let info = ctx.ledger.pending_info(&txn, &key)?.unwrap();
            total = total + info.amount;
        }
        assert_eq!(total, supply, "seed {seed}");
        assert_eq!(ctx.block_count(), initial_count + processed);
    }
    Ok(())
}
