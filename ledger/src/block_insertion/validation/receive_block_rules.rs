use super::{BlockValidator, ValidationError};
use crate::ProcessResult;

impl<'a> BlockValidator<'a> {
    pub(super) fn validate_receive(&self) -> Result<(), ValidationError> {
        self.ensure_valid_work_and_signature(false)?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_previous_is_chain_head(&previous)?;
        self.ensure_link_block_exists()?;
        let pending = self.ensure_pending_receive_exists()?;

        let received = self
            .block
            .balance()
            .checked_sub(previous.balance())
            .ok_or(ProcessResult::BalanceMismatch)?;
        if received != pending.amount || pending.token != self.block.token() {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        self.ensure_same_benefit_components(&previous)
    }
}
