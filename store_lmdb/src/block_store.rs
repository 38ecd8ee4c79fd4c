use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use anyhow::Context;
use rsdag_core::{
    utils::{Deserialize, Serialize},
    BlockHash, StateBlock,
};
use std::sync::Arc;

/// block hash -> state block
pub struct LmdbBlockStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbBlockStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(hash: &BlockHash) -> Vec<u8> {
        key_of_parts(KeyPrefix::StateBlock, &[hash.as_bytes()])
    }

    pub fn put(&self, txn: &mut LmdbWriteTransaction, block: &StateBlock) -> anyhow::Result<()> {
        txn.put(&Self::key(&block.hash()), &block.to_vec())
    }

    pub fn get(&self, txn: &dyn Transaction, hash: &BlockHash) -> anyhow::Result<Option<StateBlock>> {
        match txn.get(&Self::key(hash))? {
            Some(bytes) => {
                let block = StateBlock::deserialize_bytes(bytes)
                    .with_context(|| format!("corrupt block {}", hash))?;
                Ok(Some(block))
            }
            None => Ok(None),
        }
    }

    pub fn exists(&self, txn: &dyn Transaction, hash: &BlockHash) -> anyhow::Result<bool> {
        txn.exists(&Self::key(hash))
    }

    pub fn delete(&self, txn: &mut LmdbWriteTransaction, hash: &BlockHash) -> anyhow::Result<()> {
        txn.delete(&Self::key(hash))
    }

    pub fn count(&self, txn: &dyn Transaction) -> anyhow::Result<u64> {
        txn.count(&KeyPrefix::StateBlock.as_bytes())
    }

    pub fn for_each(
        &self,
        txn: &dyn Transaction,
        visitor: &mut dyn FnMut(StateBlock) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        txn.iterate(&KeyPrefix::StateBlock.as_bytes(), &mut |_, value| {
            visitor(StateBlock::deserialize_bytes(value)?)
        })
    }
}
