use crate::block_amount::calculate_amount;
use rsdag_core::{
    Account, AccountMeta, Amount, Benefit, BlockHash, StateBlock, TokenId, TokenMeta,
};
use rsdag_store_lmdb::{LmdbContractStore, LmdbStore, LmdbWriteTransaction, Transaction};
use std::collections::BTreeMap;

/// Contract storage that a contract tried to read does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageNotFound {
    pub key: Vec<u8>,
}

impl std::fmt::Display for StorageNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage not found: {:02x?}", self.key)
    }
}

impl std::error::Error for StorageNotFound {}

/// The view a contract has on the ledger. Reads go through the caller's transaction,
/// writes are cached and only reach the store when the block is processed.
pub struct VmContext<'a> {
    store: &'a LmdbStore,
    txn: &'a dyn Transaction,
    cache: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> VmContext<'a> {
    pub fn new(store: &'a LmdbStore, txn: &'a dyn Transaction) -> Self {
        Self {
            store,
            txn,
            cache: BTreeMap::new(),
        }
    }

    pub fn get_storage(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Vec<u8>> {
        let storage_key = LmdbContractStore::storage_key(prefix, key);
        let value = match self.cache.get(&storage_key) {
            Some(cached) => cached.clone(),
            None => self.store.contract.get(self.txn, &storage_key)?,
        };
        value.ok_or_else(|| StorageNotFound { key: storage_key }.into())
    }

    pub fn set_storage(&mut self, prefix: &[u8], key: &[u8], value: impl Into<Vec<u8>>) {
        self.cache.insert(
            LmdbContractStore::storage_key(prefix, key),
            Some(value.into()),
        );
    }

    pub fn remove_storage(&mut self, prefix: &[u8], key: &[u8]) {
        self.cache
            .insert(LmdbContractStore::storage_key(prefix, key), None);
    }

    /// Visits the storage below `prefix` with pending writes applied, in key order.
    /// The visitor gets the key without the storage prefix.
    pub fn iterate(
        &self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let scan_prefix = LmdbContractStore::storage_key(prefix, &[]);
        let mut entries = BTreeMap::new();
        self.store.contract.iterate(self.txn, prefix, &mut |k, v| {
            entries.insert(k.to_vec(), v.to_vec());
            Ok(())
        })?;
        for (key, value) in self.cache.range(scan_prefix.clone()..) {
            if !key.starts_with(&scan_prefix) {
                break;
            }
            match value {
                Some(value) => entries.insert(key.clone(), value.clone()),
                None => entries.remove(key),
            };
        }
        for (key, value) in &entries {
            visitor(&key[scan_prefix.len()..], value)?;
        }
        Ok(())
    }

    pub fn calculate_amount(&self, block: &StateBlock) -> anyhow::Result<Amount> {
        calculate_amount(self.store, self.txn, block)
    }

    pub fn get_block(&self, hash: &BlockHash) -> anyhow::Result<Option<StateBlock>> {
        self.store.block.get(self.txn, hash)
    }

    pub fn account_meta(&self, account: &Account) -> anyhow::Result<Option<AccountMeta>> {
        self.store.account.get(self.txn, account)
    }

    pub fn token_meta(
        &self,
        account: &Account,
        token: &TokenId,
    ) -> anyhow::Result<Option<TokenMeta>> {
        self.store.account.token_meta(self.txn, account, token)
    }

    pub fn representation(&self, representative: &Account) -> anyhow::Result<Benefit> {
        self.store.representation.get(self.txn, representative)
    }

    pub fn into_storage_delta(self) -> StorageDelta {
        StorageDelta {
            entries: self.cache.into_iter().collect(),
        }
    }
}

/// Storage mutations of one contract execution. `None` deletes the key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageDelta {
    pub entries: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}

impl StorageDelta {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(
        &self,
        store: &LmdbContractStore,
        txn: &mut LmdbWriteTransaction,
    ) -> anyhow::Result<()> {
        for (key, value) in &self.entries {
            match value {
                Some(value) => store.put(txn, key, value)?,
                None => store.delete(txn, key)?,
            }
        }
        Ok(())
    }
}
