use super::{BlockValidator, ValidationError};
use crate::ProcessResult;

impl<'a> BlockValidator<'a> {
    /// Change and online blocks only move the representative of the chain token
    pub(super) fn validate_change(&self) -> Result<(), ValidationError> {
        if !self.block.link().is_zero() || self.block.token() != self.ledger.constants.chain_token
        {
            return Err(ProcessResult::Other.into());
        }
        self.ensure_valid_work_and_signature(false)?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_previous_is_chain_head(&previous)?;

        if self.block.balance() != previous.balance() {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        self.ensure_same_benefit_components(&previous)
    }
}
