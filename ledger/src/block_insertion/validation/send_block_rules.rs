use super::{BlockValidator, ValidationError};
use crate::ProcessResult;

impl<'a> BlockValidator<'a> {
    pub(super) fn validate_send(&self) -> Result<(), ValidationError> {
        self.ensure_valid_work_and_signature(false)?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_previous_is_chain_head(&previous)?;

        if self.block.balance() >= previous.balance() {
            return Err(ProcessResult::BalanceMismatch.into());
        }
        self.ensure_same_benefit_components(&previous)
    }
}
