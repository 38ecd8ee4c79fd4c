mod change_block_rules;
mod common_rules;
mod contract_block_rules;
mod open_block_rules;
mod receive_block_rules;
mod send_block_rules;

use crate::{Ledger, ProcessResult};
use rsdag_core::{BlockHash, BlockType, StateBlock, TokenMeta};
use rsdag_store_lmdb::Transaction;

/// Why a block was not accepted: a soft result or a hard error
#[derive(Debug)]
pub(crate) enum ValidationError {
    Rejected(ProcessResult),
    Failed(anyhow::Error),
}

impl From<ProcessResult> for ValidationError {
    fn from(result: ProcessResult) -> Self {
        ValidationError::Rejected(result)
    }
}

impl From<anyhow::Error> for ValidationError {
    fn from(error: anyhow::Error) -> Self {
        ValidationError::Failed(error)
    }
}

/// Validates a single block against the current ledger state
pub(crate) struct BlockValidator<'a> {
    ledger: &'a Ledger,
    txn: &'a dyn Transaction,
    block: &'a StateBlock,
}

impl<'a> BlockValidator<'a> {
    pub(crate) fn new(ledger: &'a Ledger, txn: &'a dyn Transaction, block: &'a StateBlock) -> Self {
        Self { ledger, txn, block }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        self.ensure_block_does_not_exist_yet()?;
        if self.ledger.constants.is_genesis_block(self.block) {
            return Ok(());
        }
        self.ensure_benefit_in_range()?;

        match self.block.block_type() {
            BlockType::Send => self.validate_send(),
            BlockType::Receive => self.validate_receive(),
            BlockType::Change | BlockType::Online => self.validate_change(),
            BlockType::Open => self.validate_open(),
            BlockType::ContractSend => self.validate_contract_send(),
            BlockType::ContractReward => self.validate_contract_reward(),
        }
    }

    fn load_block(&self, hash: &BlockHash) -> anyhow::Result<Option<StateBlock>> {
        self.ledger.store.block.get(self.txn, hash)
    }

    fn token_meta(&self) -> anyhow::Result<Option<TokenMeta>> {
        self.ledger.store.account.token_meta(
            self.txn,
            &self.block.address(),
            &self.block.token(),
        )
    }
}
