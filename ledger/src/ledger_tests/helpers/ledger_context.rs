use super::{test_contracts, AccountBlockFactory, TestContracts, LEGACY_DEPOSIT, POV_GATED};
use crate::{Ledger, LedgerConfig, LedgerConstants, ProcessResult};
use rsdag_core::{Account, Amount, StateBlock};
use rsdag_store_lmdb::{LmdbStore, TestDbFile, Transaction};
use std::sync::Arc;

/// A ledger on a temporary LMDB file that only contains the genesis blocks
pub(crate) struct LedgerContext {
    pub ledger: Arc<Ledger>,
    pub contracts: TestContracts,
    _db_file: TestDbFile,
}

impl LedgerContext {
    pub fn empty() -> Self {
        Self::with_constants(LedgerConstants::unit_test())
    }

    pub fn with_constants(mut constants: LedgerConstants) -> Self {
        constants.reward_contract_addresses.push(*POV_GATED);
        let contracts = test_contracts();
        let config = LedgerConfig {
            gap_token_info_contracts: vec![*LEGACY_DEPOSIT],
            ..Default::default()
        };
        let db_file = TestDbFile::random();
        let store = Arc::new(LmdbStore::open(&db_file.path).build().unwrap());
        let ledger = Arc::new(
            Ledger::new(
                store,
                constants,
                Arc::new(contracts.registry.clone()),
                config,
            )
            .unwrap(),
        );

        LedgerContext {
            ledger,
            contracts,
            _db_file: db_file,
        }
    }

    pub fn genesis_block_factory(&self) -> AccountBlockFactory {
        AccountBlockFactory::genesis(&self.ledger)
    }

    pub fn block_factory(&self) -> AccountBlockFactory {
        AccountBlockFactory::new(&self.ledger)
    }

    pub fn process(&self, block: &StateBlock) -> ProcessResult {
        self.ledger.process_block(block).unwrap()
    }

    /// Processes the block and fails the test if it is not accepted
    pub fn process_ok(&self, block: &StateBlock) {
        assert_eq!(self.process(block), ProcessResult::Progress);
    }

    pub fn chain_balance(&self, account: &Account) -> Amount {
        let txn = self.ledger.store.tx_begin_read().unwrap();
        self.ledger
            .token_meta(&txn, account, &self.ledger.constants.chain_token)
            .unwrap()
            .map(|tm| tm.balance)
            .unwrap_or_default()
    }

    pub fn block_count(&self) -> u64 {
        let txn = self.ledger.store.tx_begin_read().unwrap();
        self.ledger.store.block.count(&txn).unwrap()
    }

    /// Every key and value of the database, in key order
    pub fn dump(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let txn = self.ledger.store.tx_begin_read().unwrap();
        let mut entries = Vec::new();
        txn.iterate(&[], &mut |key, value| {
            entries.push((key.to_vec(), value.to_vec()));
            Ok(())
        })
        .unwrap();
        entries
    }
}
