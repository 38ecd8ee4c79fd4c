use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use rsdag_core::{
    utils::{Deserialize, Serialize},
    Account, Benefit,
};
use std::sync::Arc;
use tracing::trace;

/// representative -> aggregated benefit of all accounts that delegate to it
pub struct LmdbRepresentationStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbRepresentationStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(representative: &Account) -> Vec<u8> {
        key_of_parts(KeyPrefix::Representation, &[representative.as_bytes()])
    }

    /// Zero benefit if the representative has no entry
    pub fn get(&self, txn: &dyn Transaction, representative: &Account) -> anyhow::Result<Benefit> {
        match txn.get(&Self::key(representative))? {
            Some(bytes) => Benefit::deserialize_bytes(bytes),
            None => Ok(Benefit::zero()),
        }
    }

    pub fn add(
        &self,
        txn: &mut LmdbWriteTransaction,
        representative: &Account,
        benefit: &Benefit,
    ) -> anyhow::Result<()> {
        let current = self.get(txn, representative)?;
        let updated = current
            .checked_add(benefit)
            .ok_or_else(|| anyhow!("representation overflow for {}", representative))?;
        trace!(%representative, total = %updated.total, "representation added");
        txn.put(&Self::key(representative), &updated.to_vec())
    }

    pub fn sub(
        &self,
        txn: &mut LmdbWriteTransaction,
        representative: &Account,
        benefit: &Benefit,
    ) -> anyhow::Result<()> {
        let current = self.get(txn, representative)?;
        let updated = current
            .checked_sub(benefit)
            .ok_or_else(|| anyhow!("representation underflow for {}", representative))?;
        trace!(%representative, total = %updated.total, "representation subtracted");
        if updated.is_zero() {
            txn.delete(&Self::key(representative))
        } else {
            txn.put(&Self::key(representative), &updated.to_vec())
        }
    }

    pub fn iter(&self, txn: &dyn Transaction) -> anyhow::Result<Vec<(Account, Benefit)>> {
        let mut result = Vec::new();
        txn.iterate(&KeyPrefix::Representation.as_bytes(), &mut |key, value| {
            let account = Account::from_slice(&key[1..])
                .ok_or_else(|| anyhow!("invalid representation key"))?;
            result.push((account, Benefit::deserialize_bytes(value)?));
            Ok(())
        })?;
        Ok(result)
    }
}
