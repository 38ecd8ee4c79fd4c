use super::{BlockValidator, ValidationError};
use crate::ProcessResult;

impl<'a> BlockValidator<'a> {
    pub(super) fn validate_open(&self) -> Result<(), ValidationError> {
        if !self.block.previous().is_zero() {
            return Err(ProcessResult::Other.into());
        }
        self.ensure_valid_work_and_signature(false)?;
        self.ensure_link_block_exists()?;
        self.ensure_chain_not_opened_yet()?;
        let pending = self.ensure_pending_receive_exists()?;

        if self.block.balance() != pending.amount
            || pending.token != self.block.token()
            || !self.block.has_zero_benefit_components()
        {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        Ok(())
    }
}
