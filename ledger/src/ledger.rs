use crate::{
    block_insertion::{BlockInserter, BlockValidator, ValidationError},
    calculate_amount,
    contracts::ContractRegistry,
    LedgerConfig, LedgerConstants, ProcessResult, WriteQueue, Writer,
};
use rsdag_core::{
    AccountMeta, Account, Amount, Benefit, BlockHash, Frontier, PendingInfo, PendingKey,
    StateBlock, TokenId, TokenMeta,
};
use rsdag_output_tracker::{OutputListenerMt, OutputTrackerMt};
use rsdag_store_lmdb::{LmdbStore, LmdbWriteTransaction, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct Ledger {
    pub store: Arc<LmdbStore>,
    pub constants: LedgerConstants,
    pub contracts: Arc<ContractRegistry>,
    pub config: LedgerConfig,
    pub write_queue: WriteQueue,
    processed_listener: OutputListenerMt<(BlockHash, ProcessResult)>,
}

impl Ledger {
    pub fn new_null() -> Self {
        Self::new(
            Arc::new(LmdbStore::new_null()),
            LedgerConstants::unit_test(),
            Arc::new(ContractRegistry::new()),
            LedgerConfig::default(),
        )
        .unwrap()
    }

    pub fn new(
        store: Arc<LmdbStore>,
        constants: LedgerConstants,
        contracts: Arc<ContractRegistry>,
        config: LedgerConfig,
    ) -> anyhow::Result<Self> {
        let ledger = Self {
            store,
            constants,
            contracts,
            config,
            write_queue: WriteQueue::new(),
            processed_listener: OutputListenerMt::new(),
        };
        ledger.initialize()?;
        Ok(ledger)
    }

    fn initialize(&self) -> anyhow::Result<()> {
        let is_empty = self.store.account.count(&self.store.tx_begin_read()?)? == 0;
        if is_empty {
            let mut txn = self.store.tx_begin_write()?;
            for block in [&self.constants.genesis_mintage, &self.constants.genesis_block] {
                let result = self.process(&mut txn, block)?;
                if result != ProcessResult::Progress {
                    bail!("can not store genesis block {}: {}", block.hash(), result);
                }
            }
            txn.commit()?;
            info!(genesis = %self.constants.genesis_block.hash(), "genesis blocks stored");
        }
        Ok(())
    }

    pub fn track_processed(&self) -> Arc<OutputTrackerMt<(BlockHash, ProcessResult)>> {
        self.processed_listener.track()
    }

    /// Validates the block and applies it if it is valid.
    /// On `Err` the transaction must be discarded.
    pub fn process(
        &self,
        txn: &mut LmdbWriteTransaction,
        block: &StateBlock,
    ) -> anyhow::Result<ProcessResult> {
        let hash = block.hash();
        let validation = BlockValidator::new(self, &*txn, block).validate();
        let result = match validation {
            Ok(()) => {
                if let Err(e) = BlockInserter::new(self, txn, block).insert() {
                    error!(%hash, "block insertion failed: {:?}", e);
                    return Err(e);
                }
                info!(
                    %hash,
                    block_type = block.block_type().as_str(),
                    address = %block.address(),
                    "block processed"
                );
                ProcessResult::Progress
            }
            Err(ValidationError::Rejected(result)) => {
                debug!(%hash, %result, "block rejected");
                result
            }
            Err(ValidationError::Failed(e)) => {
                error!(%hash, "block validation failed: {:?}", e);
                return Err(e);
            }
        };
        self.processed_listener.emit((hash, result));
        Ok(result)
    }

    /// Validates the block without changing the ledger
    pub fn block_check(
        &self,
        txn: &dyn Transaction,
        block: &StateBlock,
    ) -> anyhow::Result<ProcessResult> {
        match BlockValidator::new(self, txn, block).validate() {
            Ok(()) => Ok(ProcessResult::Progress),
            Err(ValidationError::Rejected(result)) => Ok(result),
            Err(ValidationError::Failed(e)) => Err(e),
        }
    }

    /// Processes the block in its own write transaction.
    /// The transaction is only committed if the block was accepted.
    pub fn process_block(&self, block: &StateBlock) -> anyhow::Result<ProcessResult> {
        let _guard = self.write_queue.wait(Writer::ProcessBlock);
        let mut txn = self.store.tx_begin_write()?;
        let result = self.process(&mut txn, block)?;
        if result == ProcessResult::Progress {
            txn.commit()?;
        }
        Ok(result)
    }

    pub fn check_block(&self, block: &StateBlock) -> anyhow::Result<ProcessResult> {
        let txn = self.store.tx_begin_read()?;
        self.block_check(&txn, block)
    }

    pub fn get_block(
        &self,
        txn: &dyn Transaction,
        hash: &BlockHash,
    ) -> anyhow::Result<Option<StateBlock>> {
        self.store.block.get(txn, hash)
    }

    pub fn block_exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> anyhow::Result<bool> {
        self.store.block.exists(txn, hash)
    }

    pub fn account_meta(
        &self,
        txn: &dyn Transaction,
        account: &Account,
    ) -> anyhow::Result<Option<AccountMeta>> {
        self.store.account.get(txn, account)
    }

    pub fn token_meta(
        &self,
        txn: &dyn Transaction,
        account: &Account,
        token: &TokenId,
    ) -> anyhow::Result<Option<TokenMeta>> {
        self.store.account.token_meta(txn, account, token)
    }

    pub fn pending_info(
        &self,
        txn: &dyn Transaction,
        key: &PendingKey,
    ) -> anyhow::Result<Option<PendingInfo>> {
        self.store.pending.get(txn, key)
    }

    /// Everything that can be received by `address`
    pub fn pending_for(
        &self,
        txn: &dyn Transaction,
        address: &Account,
    ) -> anyhow::Result<Vec<(PendingKey, PendingInfo)>> {
        self.store.pending.iter_address(txn, address)
    }

    pub fn frontier(
        &self,
        txn: &dyn Transaction,
        header: &BlockHash,
    ) -> anyhow::Result<Option<Frontier>> {
        self.store.frontier.get(txn, header)
    }

    pub fn representation(
        &self,
        txn: &dyn Transaction,
        representative: &Account,
    ) -> anyhow::Result<Benefit> {
        self.store.representation.get(txn, representative)
    }

    pub fn calculate_amount(
        &self,
        txn: &dyn Transaction,
        block: &StateBlock,
    ) -> anyhow::Result<Amount> {
        calculate_amount(&self.store, txn, block)
    }
}
