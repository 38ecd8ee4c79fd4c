use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use rsdag_core::{BlockHash, Frontier};
use std::sync::Arc;

/// header block -> open block of the same token chain
pub struct LmdbFrontierStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbFrontierStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(header: &BlockHash) -> Vec<u8> {
        key_of_parts(KeyPrefix::Frontier, &[header.as_bytes()])
    }

    pub fn put(&self, txn: &mut LmdbWriteTransaction, frontier: &Frontier) -> anyhow::Result<()> {
        txn.put(
            &Self::key(&frontier.header_block),
            frontier.open_block.as_bytes(),
        )
    }

    pub fn get(&self, txn: &dyn Transaction, header: &BlockHash) -> anyhow::Result<Option<Frontier>> {
        match txn.get(&Self::key(header))? {
            Some(bytes) => {
                let open_block = BlockHash::from_slice(bytes)
                    .ok_or_else(|| anyhow!("invalid frontier value for {}", header))?;
                Ok(Some(Frontier::new(*header, open_block)))
            }
            None => Ok(None),
        }
    }

    pub fn exists(&self, txn: &dyn Transaction, header: &BlockHash) -> anyhow::Result<bool> {
        txn.exists(&Self::key(header))
    }

    pub fn delete(&self, txn: &mut LmdbWriteTransaction, header: &BlockHash) -> anyhow::Result<()> {
        txn.delete(&Self::key(header))
    }

    pub fn count(&self, txn: &dyn Transaction) -> anyhow::Result<u64> {
        txn.count(&KeyPrefix::Frontier.as_bytes())
    }
}
