use super::{BlockValidator, ValidationError};
use crate::{
    calculate_amount,
    contracts::{ContractCapability, ContractReward, StorageNotFound, VmContext},
    ProcessResult,
};
use rsdag_core::Account;
use tracing::warn;

impl<'a> BlockValidator<'a> {
    pub(super) fn validate_contract_send(&self) -> Result<(), ValidationError> {
        let contract_address = Account::from(self.block.link());
        self.ensure_valid_work_and_signature(
            self.ledger.constants.is_no_sign_address(&contract_address),
        )?;
        let previous = self.ensure_previous_block_exists()?;
        self.ensure_previous_is_chain_head(&previous)?;
        let total = self
            .block
            .total_balance()
            .ok_or(ProcessResult::BalanceMismatch)?;
        let previous_total = previous
            .total_balance()
            .ok_or_else(|| anyhow!("benefit of block {} overflows", previous.hash()))?;
        if total > previous_total {
            return Err(ProcessResult::BalanceMismatch.into());
        }

        if !self.ledger.contracts.is_chain_contract(&contract_address) {
            return Err(ProcessResult::GapSmartContract.into());
        }
        let method = self
            .ledger
            .contracts
            .resolve(&contract_address, self.block.data())?;

        let mut ctx = VmContext::new(&self.ledger.store, self.txn);
        let mut simulated = self.block.clone();
        match method.send_side() {
            Some(ContractCapability::LegacySend(contract)) => {
                contract.do_send(&mut ctx, &mut simulated)?;
            }
            Some(ContractCapability::SimulatedSend(contract)) => {
                if self
                    .ledger
                    .constants
                    .is_reward_contract_address(&contract_address)
                {
                    let height = contract.do_gap_pov(&ctx, self.block)?;
                    if height > 0 {
                        return Err(ProcessResult::GapPovHeight.into());
                    }
                }
                contract.process_send(&mut ctx, &mut simulated)?;
            }
            _ => {
                return Err(anyhow!(
                    "method {} of contract {} can not send",
                    method.name,
                    contract_address
                )
                .into())
            }
        }

        if simulated.data() != self.block.data() {
            warn!(
                hash = %self.block.hash(),
                contract = %contract_address,
                "contract send data does not match"
            );
            return Err(ProcessResult::InvalidData.into());
        }
        Ok(())
    }

    pub(super) fn validate_contract_reward(&self) -> Result<(), ValidationError> {
        let input = self.ensure_link_block_exists()?;
        let contract_address = Account::from(input.link());
        self.ensure_valid_work_and_signature(
            self.ledger.constants.is_no_sign_address(&contract_address),
        )?;
        if self.block.is_open() {
            self.ensure_chain_not_opened_yet()?;
        } else {
            let previous = self.ensure_previous_block_exists()?;
            self.ensure_previous_is_chain_head(&previous)?;
        }
        self.ensure_pending_receive_exists()?;

        let method = self
            .ledger
            .contracts
            .resolve(&contract_address, input.data())?;
        let contract = method.receive_side().ok_or_else(|| {
            anyhow!(
                "method {} of contract {} can not receive",
                method.name,
                contract_address
            )
        })?;

        let mut ctx = VmContext::new(&self.ledger.store, self.txn);
        let mut simulated = self.block.clone();
        let rewards = match contract.do_receive(&mut ctx, &mut simulated, &input) {
            Ok(rewards) => rewards,
            Err(e)
                if e.is::<StorageNotFound>()
                    && self
                        .ledger
                        .config
                        .gap_token_info_contracts
                        .contains(&contract_address) =>
            {
                return Err(ProcessResult::GapTokenInfo.into());
            }
            Err(e) => return Err(e.into()),
        };
        let reward = rewards
            .first()
            .ok_or_else(|| anyhow!("can not generate receive block"))?;

        if !self.reward_matches_block(reward)? {
            warn!(
                hash = %self.block.hash(),
                contract = %contract_address,
                "contract reward does not match"
            );
            return Err(ProcessResult::InvalidData.into());
        }
        Ok(())
    }

    fn reward_matches_block(&self, reward: &ContractReward) -> anyhow::Result<bool> {
        let amount = calculate_amount(&self.ledger.store, self.txn, self.block)?;
        Ok(reward.block.data() == self.block.data()
            && reward.token == self.block.token()
            && reward.amount == amount
            && reward.to_address == self.block.address())
    }
}
