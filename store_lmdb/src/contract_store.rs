use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use std::sync::Arc;

/// Raw key/value storage of contracts. Keys are `100 | contract prefix | key`.
pub struct LmdbContractStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbContractStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    pub fn storage_key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
        key_of_parts(KeyPrefix::ContractStorage, &[prefix, key])
    }

    pub fn get(&self, txn: &dyn Transaction, storage_key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(txn.get(storage_key)?.map(|v| v.to_vec()))
    }

    pub fn put(
        &self,
        txn: &mut LmdbWriteTransaction,
        storage_key: &[u8],
        value: &[u8],
    ) -> anyhow::Result<()> {
        ensure_contract_key(storage_key)?;
        txn.put(storage_key, value)
    }

    pub fn delete(&self, txn: &mut LmdbWriteTransaction, storage_key: &[u8]) -> anyhow::Result<()> {
        ensure_contract_key(storage_key)?;
        txn.delete(storage_key)
    }

    /// Visits all entries below `100 | prefix`
    pub fn iterate(
        &self,
        txn: &dyn Transaction,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        txn.iterate(&Self::storage_key(prefix, &[]), visitor)
    }
}

fn ensure_contract_key(storage_key: &[u8]) -> anyhow::Result<()> {
    if storage_key.first() != Some(&(KeyPrefix::ContractStorage as u8)) {
        bail!("not a contract storage key");
    }
    Ok(())
}
