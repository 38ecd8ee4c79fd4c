use super::{BlockValidator, ValidationError};
use crate::ProcessResult;
use rsdag_core::{validate_block_signature, PendingInfo, PendingKey, StateBlock, TokenMeta};

impl<'a> BlockValidator<'a> {
    pub(super) fn ensure_block_does_not_exist_yet(&self) -> Result<(), ValidationError> {
        if self.ledger.store.block.exists(self.txn, &self.block.hash())? {
            return Err(ProcessResult::Old.into());
        }
        Ok(())
    }

    /// Blocks towards a no-sign address carry neither work nor signature
    pub(super) fn ensure_valid_work_and_signature(
        &self,
        no_sign: bool,
    ) -> Result<(), ValidationError> {
        if no_sign {
            return Ok(());
        }
        if !self.ledger.constants.work.is_valid_pow(self.block) {
            return Err(ProcessResult::BadWork.into());
        }
        if validate_block_signature(self.block).is_err() {
            return Err(ProcessResult::BadSignature.into());
        }
        Ok(())
    }

    pub(super) fn ensure_previous_block_exists(&self) -> Result<StateBlock, ValidationError> {
        self.load_block(&self.block.previous())?
            .ok_or(ProcessResult::GapPrevious.into())
    }

    /// The previous block must be the head of the block's token chain
    pub(super) fn ensure_previous_is_chain_head(
        &self,
        previous: &StateBlock,
    ) -> Result<TokenMeta, ValidationError> {
        let token_meta = self.token_meta()?.ok_or(ProcessResult::Other)?;
        if token_meta.header != previous.hash() {
            return Err(ProcessResult::Fork.into());
        }
        Ok(token_meta)
    }

    /// An open block must not replace an existing token chain
    pub(super) fn ensure_chain_not_opened_yet(&self) -> Result<(), ValidationError> {
        if self.token_meta()?.is_some() {
            return Err(ProcessResult::Fork.into());
        }
        Ok(())
    }

    pub(super) fn ensure_link_block_exists(&self) -> Result<StateBlock, ValidationError> {
        self.load_block(&self.block.link().into())?
            .ok_or(ProcessResult::GapSource.into())
    }

    pub(super) fn ensure_pending_receive_exists(&self) -> Result<PendingInfo, ValidationError> {
        self.ledger
            .store
            .pending
            .get(self.txn, &PendingKey::for_receive_block(self.block))?
            .ok_or(ProcessResult::UnReceivable.into())
    }

    /// Balance plus the benefit components must fit into an amount
    pub(super) fn ensure_benefit_in_range(&self) -> Result<(), ValidationError> {
        if self.block.benefit().is_none() {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        Ok(())
    }

    pub(super) fn ensure_same_benefit_components(
        &self,
        previous: &StateBlock,
    ) -> Result<(), ValidationError> {
        if !self.block.same_benefit_components(previous) {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        Ok(())
    }
}
