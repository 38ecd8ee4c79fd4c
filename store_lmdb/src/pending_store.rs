use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use rsdag_core::{
    utils::{Deserialize, Serialize},
    Account, PendingInfo, PendingKey,
};
use std::sync::Arc;

/// (receiving address, send block hash) -> pending info
pub struct LmdbPendingStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbPendingStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(key: &PendingKey) -> Vec<u8> {
        key_of_parts(KeyPrefix::Pending, &[&key.to_bytes()])
    }

    pub fn put(
        &self,
        txn: &mut LmdbWriteTransaction,
        key: &PendingKey,
        pending: &PendingInfo,
    ) -> anyhow::Result<()> {
        txn.put(&Self::key(key), &pending.to_vec())
    }

    pub fn get(&self, txn: &dyn Transaction, key: &PendingKey) -> anyhow::Result<Option<PendingInfo>> {
        txn.get(&Self::key(key))?
            .map(PendingInfo::deserialize_bytes)
            .transpose()
    }

    pub fn exists(&self, txn: &dyn Transaction, key: &PendingKey) -> anyhow::Result<bool> {
        txn.exists(&Self::key(key))
    }

    pub fn delete(&self, txn: &mut LmdbWriteTransaction, key: &PendingKey) -> anyhow::Result<()> {
        txn.delete(&Self::key(key))
    }

    /// All pending entries of one address, ordered by send block hash
    pub fn iter_address(
        &self,
        txn: &dyn Transaction,
        address: &Account,
    ) -> anyhow::Result<Vec<(PendingKey, PendingInfo)>> {
        let prefix = key_of_parts(KeyPrefix::Pending, &[address.as_bytes()]);
        let mut result = Vec::new();
        txn.iterate(&prefix, &mut |key, value| {
            let key = PendingKey::deserialize_bytes(&key[1..])?;
            result.push((key, PendingInfo::deserialize_bytes(value)?));
            Ok(())
        })?;
        Ok(result)
    }

    pub fn count(&self, txn: &dyn Transaction) -> anyhow::Result<u64> {
        txn.count(&KeyPrefix::Pending.as_bytes())
    }
}
