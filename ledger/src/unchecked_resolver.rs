use crate::{Ledger, ProcessResult, Writer};
use rsdag_core::{
    BlockHash, StateBlock, SynchronizedKind, TokenId, UncheckedInfo, UncheckedKind,
};
use rsdag_store_lmdb::{LmdbWriteTransaction, UncheckedBlockExists};
use std::{collections::VecDeque, sync::Arc};
use tracing::{debug, error, warn};

/// Parks blocks that gapped and resubmits them once their dependency arrived
pub struct UncheckedBlockResolver {
    ledger: Arc<Ledger>,
}

impl UncheckedBlockResolver {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Parks `block` under the dependency named by `result`. Returns false if `result`
    /// is not a gap or the dependency slot is already taken.
    pub fn add(
        &self,
        txn: &mut LmdbWriteTransaction,
        block: &StateBlock,
        result: ProcessResult,
        sync: SynchronizedKind,
    ) -> anyhow::Result<bool> {
        let info = UncheckedInfo::new(block.clone(), sync);
        let unchecked = &self.ledger.store.unchecked;
        let (dependency, kind) = match result {
            ProcessResult::GapPrevious => (block.previous(), UncheckedKind::Previous),
            ProcessResult::GapSource | ProcessResult::GapSmartContract => {
                (block.link().into(), UncheckedKind::Link)
            }
            ProcessResult::GapTokenInfo => (
                BlockHash::from_bytes(*block.token().as_bytes()),
                UncheckedKind::TokenInfo,
            ),
            ProcessResult::GapPovHeight => {
                unchecked.add_gap_pov(txn, block.pov_height(), &info)?;
                debug!(hash = %block.hash(), height = block.pov_height(), "block waits for pov height");
                return Ok(true);
            }
            _ => return Ok(false),
        };

        match unchecked.add(txn, &dependency, &info, kind) {
            Ok(()) => {
                debug!(
                    hash = %block.hash(),
                    %dependency,
                    kind = kind.as_str(),
                    "unchecked block added"
                );
                Ok(true)
            }
            Err(e) if e.is::<UncheckedBlockExists>() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Processes a block and parks it if one of its dependencies is missing.
    /// Blocks that waited for it are processed as well.
    pub fn process(
        &self,
        block: &StateBlock,
        sync: SynchronizedKind,
    ) -> anyhow::Result<ProcessResult> {
        let result = self.ledger.process_block(block)?;
        if result == ProcessResult::Progress {
            self.block_arrived(&block.hash())?;
        } else if result.is_gap() {
            self.park(block, result, sync)?;
        }
        Ok(result)
    }

    fn park(
        &self,
        block: &StateBlock,
        result: ProcessResult,
        sync: SynchronizedKind,
    ) -> anyhow::Result<bool> {
        let _guard = self.ledger.write_queue.wait(Writer::Unchecked);
        let mut txn = self.ledger.store.tx_begin_write()?;
        let added = self.add(&mut txn, block, result, sync)?;
        txn.commit()?;
        Ok(added)
    }

    /// Resubmits every block that waited for `hash` as its previous block or as its link,
    /// and recursively the blocks that waited for those. Blocks that fail with an error
    /// are dropped and left out of the returned list.
    pub fn block_arrived(&self, hash: &BlockHash) -> anyhow::Result<Vec<(BlockHash, ProcessResult)>> {
        let mut processed = Vec::new();
        let mut arrived = VecDeque::from([*hash]);
        while let Some(dependency) = arrived.pop_front() {
            for kind in [UncheckedKind::Previous, UncheckedKind::Link] {
                if let Some(info) = self.take(&dependency, kind)? {
                    self.resubmit(info, &mut arrived, &mut processed)?;
                }
            }
        }
        Ok(processed)
    }

    /// Resubmits the blocks that waited for the definition of `token`
    pub fn token_info_arrived(
        &self,
        token: &TokenId,
    ) -> anyhow::Result<Vec<(BlockHash, ProcessResult)>> {
        let mut processed = Vec::new();
        let mut arrived = VecDeque::new();
        let dependency = BlockHash::from_bytes(*token.as_bytes());
        if let Some(info) = self.take(&dependency, UncheckedKind::TokenInfo)? {
            self.resubmit(info, &mut arrived, &mut processed)?;
        }
        while let Some(hash) = arrived.pop_front() {
            processed.extend(self.block_arrived(&hash)?);
        }
        Ok(processed)
    }

    /// Resubmits the blocks that waited for the external chain to reach `height`
    pub fn pov_height_arrived(
        &self,
        height: u64,
    ) -> anyhow::Result<Vec<(BlockHash, ProcessResult)>> {
        let waiting = {
            let _guard = self.ledger.write_queue.wait(Writer::Unchecked);
            let mut txn = self.ledger.store.tx_begin_write()?;
            let mut waiting = Vec::new();
            self.ledger
                .store
                .unchecked
                .walk_gap_pov_at_height(&txn, height, &mut |info, _| {
                    waiting.push(info);
                    Ok(())
                })?;
            for info in &waiting {
                self.ledger
                    .store
                    .unchecked
                    .delete_gap_pov(&mut txn, height, &info.block.hash())?;
            }
            txn.commit()?;
            waiting
        };

        let mut processed = Vec::new();
        let mut arrived = VecDeque::new();
        for info in waiting {
            self.resubmit(info, &mut arrived, &mut processed)?;
        }
        while let Some(hash) = arrived.pop_front() {
            processed.extend(self.block_arrived(&hash)?);
        }
        Ok(processed)
    }

    fn take(
        &self,
        dependency: &BlockHash,
        kind: UncheckedKind,
    ) -> anyhow::Result<Option<UncheckedInfo>> {
        let _guard = self.ledger.write_queue.wait(Writer::Unchecked);
        let mut txn = self.ledger.store.tx_begin_write()?;
        let unchecked = &self.ledger.store.unchecked;
        let info = unchecked.get(&txn, dependency, kind)?;
        if info.is_some() {
            unchecked.delete(&mut txn, dependency, kind)?;
            txn.commit()?;
        }
        Ok(info)
    }

    fn resubmit(
        &self,
        info: UncheckedInfo,
        arrived: &mut VecDeque<BlockHash>,
        processed: &mut Vec<(BlockHash, ProcessResult)>,
    ) -> anyhow::Result<()> {
        let hash = info.block.hash();
        // a failing block is dropped and must not stall its siblings
        let result = match self.ledger.process_block(&info.block) {
            Ok(result) => result,
            Err(e) => {
                error!(%hash, "dropping unchecked block: {:?}", e);
                return Ok(());
            }
        };
        if result == ProcessResult::Progress {
            arrived.push_back(hash);
        } else if result.is_gap() {
            self.park(&info.block, result, info.sync)?;
        } else {
            warn!(%hash, %result, "dropping unchecked block");
        }
        processed.push((hash, result));
        Ok(())
    }
}
