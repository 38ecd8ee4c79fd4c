use crate::{key_of_parts, KeyPrefix, LmdbEnv, LmdbWriteTransaction, Transaction};
use rsdag_core::{
    utils::{Deserialize, Serialize},
    BlockHash, UncheckedInfo, UncheckedKind,
};
use std::sync::Arc;

/// Adding an unchecked block under a key that is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UncheckedBlockExists;

impl std::fmt::Display for UncheckedBlockExists {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unchecked block already exists")
    }
}

impl std::error::Error for UncheckedBlockExists {}

fn prefix_of(kind: UncheckedKind) -> KeyPrefix {
    match kind {
        UncheckedKind::Previous => KeyPrefix::UncheckedBlockPrevious,
        UncheckedKind::Link => KeyPrefix::UncheckedBlockLink,
        UncheckedKind::TokenInfo => KeyPrefix::UncheckedTokenInfo,
        UncheckedKind::Publish => KeyPrefix::GapPublish,
    }
}

/// Blocks that could not be processed yet, parked by the dependency they wait for.
///
/// Besides the four kinds there are three auxiliary partitions: blocks waiting for a
/// PoV height (`height | hash`), blocks waiting for a publish or a DoD settlement
/// (`key | hash`, several blocks per key) and the PoV heights that are known to be missing.
pub struct LmdbUncheckedStore {
    _env: Arc<LmdbEnv>,
}

impl LmdbUncheckedStore {
    pub fn new(env: Arc<LmdbEnv>) -> Self {
        Self { _env: env }
    }

    fn key(dependency: &BlockHash, kind: UncheckedKind) -> Vec<u8> {
        key_of_parts(prefix_of(kind), &[dependency.as_bytes()])
    }

    pub fn add(
        &self,
        txn: &mut LmdbWriteTransaction,
        dependency: &BlockHash,
        info: &UncheckedInfo,
        kind: UncheckedKind,
    ) -> anyhow::Result<()> {
        let key = Self::key(dependency, kind);
        if txn.exists(&key)? {
            return Err(UncheckedBlockExists.into());
        }
        txn.put(&key, &info.to_vec())
    }

    pub fn get(
        &self,
        txn: &dyn Transaction,
        dependency: &BlockHash,
        kind: UncheckedKind,
    ) -> anyhow::Result<Option<UncheckedInfo>> {
        txn.get(&Self::key(dependency, kind))?
            .map(UncheckedInfo::deserialize_bytes)
            .transpose()
    }

    pub fn exists(
        &self,
        txn: &dyn Transaction,
        dependency: &BlockHash,
        kind: UncheckedKind,
    ) -> anyhow::Result<bool> {
        txn.exists(&Self::key(dependency, kind))
    }

    pub fn delete(
        &self,
        txn: &mut LmdbWriteTransaction,
        dependency: &BlockHash,
        kind: UncheckedKind,
    ) -> anyhow::Result<()> {
        txn.delete(&Self::key(dependency, kind))
    }

    /// Visits Previous, Link, TokenInfo and Publish entries in that order
    pub fn walk(
        &self,
        txn: &dyn Transaction,
        visitor: &mut dyn FnMut(UncheckedInfo, BlockHash, UncheckedKind) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        for kind in UncheckedKind::ALL {
            txn.iterate(&prefix_of(kind).as_bytes(), &mut |key, value| {
                let info = UncheckedInfo::deserialize_bytes(value)?;
                let dependency = key
                    .get(1..33)
                    .and_then(BlockHash::from_slice)
                    .ok_or_else(|| anyhow!("invalid unchecked key"))?;
                visitor(info, dependency, kind)
                    .map_err(|e| anyhow!("visit unchecked error: {}", e))
            })?;
        }
        Ok(())
    }

    /// Number of parked blocks. Blocks waiting for token info are not counted.
    pub fn count(&self, txn: &dyn Transaction) -> anyhow::Result<u64> {
        let mut count = 0;
        for prefix in [
            KeyPrefix::UncheckedBlockLink,
            KeyPrefix::UncheckedBlockPrevious,
            KeyPrefix::UncheckedPovHeight,
            KeyPrefix::GapPublish,
            KeyPrefix::GapDoDSettleState,
        ] {
            count += txn.count(&prefix.as_bytes())?;
        }
        Ok(count)
    }

    fn gap_pov_key(height: u64, hash: &BlockHash) -> Vec<u8> {
        key_of_parts(
            KeyPrefix::UncheckedPovHeight,
            &[&height.to_be_bytes(), hash.as_bytes()],
        )
    }

    pub fn add_gap_pov(
        &self,
        txn: &mut LmdbWriteTransaction,
        height: u64,
        info: &UncheckedInfo,
    ) -> anyhow::Result<()> {
        txn.put(&Self::gap_pov_key(height, &info.block.hash()), &info.to_vec())
    }

    pub fn delete_gap_pov(
        &self,
        txn: &mut LmdbWriteTransaction,
        height: u64,
        hash: &BlockHash,
    ) -> anyhow::Result<()> {
        txn.delete(&Self::gap_pov_key(height, hash))
    }

    pub fn walk_gap_pov_at_height(
        &self,
        txn: &dyn Transaction,
        height: u64,
        visitor: &mut dyn FnMut(UncheckedInfo, u64) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let prefix = key_of_parts(KeyPrefix::UncheckedPovHeight, &[&height.to_be_bytes()]);
        txn.iterate(&prefix, &mut |_, value| {
            visitor(UncheckedInfo::deserialize_bytes(value)?, height)
        })
    }

    /// Visits all blocks waiting for a PoV height, lowest height first
    pub fn walk_gap_pov(
        &self,
        txn: &dyn Transaction,
        visitor: &mut dyn FnMut(UncheckedInfo, u64) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        txn.iterate(&KeyPrefix::UncheckedPovHeight.as_bytes(), &mut |key, value| {
            let height = key
                .get(1..9)
                .and_then(|bytes| bytes.try_into().ok())
                .map(u64::from_be_bytes)
                .ok_or_else(|| anyhow!("invalid gap pov key"))?;
            visitor(UncheckedInfo::deserialize_bytes(value)?, height)
        })
    }

    fn pov_height_gap_key(height: u64) -> Vec<u8> {
        key_of_parts(KeyPrefix::GapPovHeight, &[&height.to_be_bytes()])
    }

    pub fn add_pov_height_gap(&self, txn: &mut LmdbWriteTransaction, height: u64) -> anyhow::Result<()> {
        txn.put(&Self::pov_height_gap_key(height), &[])
    }

    pub fn has_pov_height_gap(&self, txn: &dyn Transaction, height: u64) -> anyhow::Result<bool> {
        txn.exists(&Self::pov_height_gap_key(height))
    }

    pub fn delete_pov_height_gap(&self, txn: &mut LmdbWriteTransaction, height: u64) -> anyhow::Result<()> {
        txn.delete(&Self::pov_height_gap_key(height))
    }

    pub fn add_gap_publish(
        &self,
        txn: &mut LmdbWriteTransaction,
        key: &BlockHash,
        info: &UncheckedInfo,
    ) -> anyhow::Result<()> {
        add_keyed(txn, KeyPrefix::GapPublish, key, info)
    }

    pub fn delete_gap_publish(
        &self,
        txn: &mut LmdbWriteTransaction,
        key: &BlockHash,
        hash: &BlockHash,
    ) -> anyhow::Result<()> {
        txn.delete(&key_of_parts(
            KeyPrefix::GapPublish,
            &[key.as_bytes(), hash.as_bytes()],
        ))
    }

    /// Visits every block waiting for `key`. A failing visit does not stop the walk;
    /// all failures are reported together afterwards.
    pub fn walk_gap_publish(
        &self,
        txn: &dyn Transaction,
        key: &BlockHash,
        visitor: &mut dyn FnMut(UncheckedInfo) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        walk_keyed(txn, KeyPrefix::GapPublish, key, visitor)
    }

    pub fn add_gap_dod_settle_state(
        &self,
        txn: &mut LmdbWriteTransaction,
        key: &BlockHash,
        info: &UncheckedInfo,
    ) -> anyhow::Result<()> {
        add_keyed(txn, KeyPrefix::GapDoDSettleState, key, info)
    }

    pub fn delete_gap_dod_settle_state(
        &self,
        txn: &mut LmdbWriteTransaction,
        key: &BlockHash,
        hash: &BlockHash,
    ) -> anyhow::Result<()> {
        txn.delete(&key_of_parts(
            KeyPrefix::GapDoDSettleState,
            &[key.as_bytes(), hash.as_bytes()],
        ))
    }

    pub fn walk_gap_dod_settle_state(
        &self,
        txn: &dyn Transaction,
        key: &BlockHash,
        visitor: &mut dyn FnMut(UncheckedInfo) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        walk_keyed(txn, KeyPrefix::GapDoDSettleState, key, visitor)
    }
}

fn add_keyed(
    txn: &mut LmdbWriteTransaction,
    prefix: KeyPrefix,
    key: &BlockHash,
    info: &UncheckedInfo,
) -> anyhow::Result<()> {
    let full_key = key_of_parts(prefix, &[key.as_bytes(), info.block.hash().as_bytes()]);
    if txn.exists(&full_key)? {
        return Err(UncheckedBlockExists.into());
    }
    txn.put(&full_key, &info.to_vec())
}

fn walk_keyed(
    txn: &dyn Transaction,
    prefix: KeyPrefix,
    key: &BlockHash,
    visitor: &mut dyn FnMut(UncheckedInfo) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut errors = Vec::new();
    txn.iterate(&key_of_parts(prefix, &[key.as_bytes()]), &mut |_, value| {
        let info = UncheckedInfo::deserialize_bytes(value)?;
        if let Err(e) = visitor(info) {
            errors.push(e.to_string());
        }
        Ok(())
    })?;
    if !errors.is_empty() {
        bail!("{}", errors.join(", "));
    }
    Ok(())
}
