use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use rsdag_core::{
    utils::{Deserialize, Serialize},
    Account, AccountMeta, TokenId, TokenMeta,
};
use std::sync::Arc;

/// account -> account meta with all token chains of the account
pub struct LmdbAccountStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbAccountStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(account: &Account) -> Vec<u8> {
        key_of_parts(KeyPrefix::AccountMeta, &[account.as_bytes()])
    }

    pub fn put(&self, txn: &mut LmdbWriteTransaction, meta: &AccountMeta) -> anyhow::Result<()> {
        txn.put(&Self::key(&meta.address), &meta.to_vec())
    }

    pub fn get(&self, txn: &dyn Transaction, account: &Account) -> anyhow::Result<Option<AccountMeta>> {
        txn.get(&Self::key(account))?
            .map(AccountMeta::deserialize_bytes)
            .transpose()
    }

    pub fn token_meta(
        &self,
        txn: &dyn Transaction,
        account: &Account,
        token: &TokenId,
    ) -> anyhow::Result<Option<TokenMeta>> {
        Ok(self
            .get(txn, account)?
            .and_then(|meta| meta.token(token).cloned()))
    }

    pub fn exists(&self, txn: &dyn Transaction, account: &Account) -> anyhow::Result<bool> {
        txn.exists(&Self::key(account))
    }

    pub fn delete(&self, txn: &mut LmdbWriteTransaction, account: &Account) -> anyhow::Result<()> {
        txn.delete(&Self::key(account))
    }

    pub fn count(&self, txn: &dyn Transaction) -> anyhow::Result<u64> {
        txn.count(&KeyPrefix::AccountMeta.as_bytes())
    }
}
