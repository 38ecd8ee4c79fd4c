use crate::{
    contracts::{ContractCapability, StorageDelta, VmContext},
    Ledger,
};
use rsdag_core::{
    utils::seconds_since_epoch, Account, AccountMeta, BlockType, Frontier, PendingInfo,
    PendingKey, StateBlock, TokenMeta,
};
use rsdag_store_lmdb::LmdbWriteTransaction;
use tracing::debug;

/// What the contract of a contract block adds to the state change
#[derive(Default)]
struct ContractEffects {
    pending: Option<(PendingKey, PendingInfo)>,
    storage: StorageDelta,
}

/// Applies a validated block to the ledger
pub(crate) struct BlockInserter<'a, 'env> {
    ledger: &'a Ledger,
    txn: &'a mut LmdbWriteTransaction<'env>,
    block: &'a StateBlock,
}

impl<'a, 'env> BlockInserter<'a, 'env> {
    pub(crate) fn new(
        ledger: &'a Ledger,
        txn: &'a mut LmdbWriteTransaction<'env>,
        block: &'a StateBlock,
    ) -> Self {
        Self { ledger, txn, block }
    }

    pub(crate) fn insert(&mut self) -> anyhow::Result<()> {
        // contracts see the state before the block
        let effects = self.contract_effects()?;

        self.ledger.store.block.put(self.txn, self.block)?;
        let account_meta = self
            .ledger
            .store
            .account
            .get(&*self.txn, &self.block.address())?;
        let token_meta = account_meta
            .as_ref()
            .and_then(|am| am.token(&self.block.token()))
            .cloned();

        if self.is_chain_token() {
            self.update_representation(account_meta.as_ref(), token_meta.as_ref())?;
        }
        self.update_pending(effects.pending)?;
        self.update_frontier(token_meta.as_ref())?;
        self.update_account_meta(account_meta, token_meta)?;
        if !effects.storage.is_empty() {
            effects.storage.apply(&self.ledger.store.contract, self.txn)?;
        }
        Ok(())
    }

    fn is_chain_token(&self) -> bool {
        self.block.token() == self.ledger.constants.chain_token
    }

    fn contract_effects(&self) -> anyhow::Result<ContractEffects> {
        if self.ledger.constants.is_genesis_block(self.block) {
            return Ok(ContractEffects::default());
        }
        match self.block.block_type() {
            BlockType::ContractSend => self.contract_send_effects(),
            BlockType::ContractReward => self.contract_reward_effects(),
            _ => Ok(ContractEffects::default()),
        }
    }

    fn contract_send_effects(&self) -> anyhow::Result<ContractEffects> {
        let contract_address = Account::from(self.block.link());
        let method = self
            .ledger
            .contracts
            .resolve(&contract_address, self.block.data())?;
        match method.send_side() {
            Some(ContractCapability::LegacySend(contract)) => Ok(ContractEffects {
                pending: contract.do_pending(self.block)?,
                storage: StorageDelta::default(),
            }),
            Some(ContractCapability::SimulatedSend(contract)) => {
                let mut ctx = VmContext::new(&self.ledger.store, &*self.txn);
                let mut block = self.block.clone();
                let pending = contract.process_send(&mut ctx, &mut block)?;
                Ok(ContractEffects {
                    pending,
                    storage: ctx.into_storage_delta(),
                })
            }
            _ => bail!(
                "method {} of contract {} can not send",
                method.name,
                contract_address
            ),
        }
    }

    fn contract_reward_effects(&self) -> anyhow::Result<ContractEffects> {
        let input = self
            .ledger
            .store
            .block
            .get(&*self.txn, &self.block.link().into())?
            .ok_or_else(|| anyhow!("input block {} not found", self.block.link()))?;
        let contract_address = Account::from(input.link());
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

        let mut ctx = VmContext::new(&self.ledger.store, &*self.txn);
        let mut block = self.block.clone();
        let rewards = contract.do_receive(&mut ctx, &mut block, &input)?;
        if rewards.is_empty() {
            bail!("invalid contract data for block {}", self.block.hash());
        }
        Ok(ContractEffects {
            pending: None,
            storage: ctx.into_storage_delta(),
        })
    }

    fn update_representation(
        &mut self,
        account_meta: Option<&AccountMeta>,
        token_meta: Option<&TokenMeta>,
    ) -> anyhow::Result<()> {
        let representation = &self.ledger.store.representation;
        if let (Some(am), Some(tm)) = (account_meta, token_meta) {
            if !tm.representative.is_zero() {
                let previous = am
                    .coin_benefit()
                    .ok_or_else(|| anyhow!("benefit of account {} overflows", am.address))?;
                representation.sub(self.txn, &tm.representative, &previous)?;
            }
        }

        let benefit = self
            .block
            .benefit()
            .ok_or_else(|| anyhow!("benefit of block {} overflows", self.block.hash()))?;
        let representative = self.block.representative();
        if !representative.is_zero() && !benefit.is_zero() {
            representation.add(self.txn, &representative, &benefit)?;
        }
        Ok(())
    }

    fn update_pending(
        &mut self,
        contract_pending: Option<(PendingKey, PendingInfo)>,
    ) -> anyhow::Result<()> {
        let pending = &self.ledger.store.pending;
        match self.block.block_type() {
            BlockType::Send => {
                let previous = self
                    .ledger
                    .store
                    .block
                    .get(&*self.txn, &self.block.previous())?
                    .ok_or_else(|| anyhow!("previous block {} not found", self.block.previous()))?;
                let amount = previous
                    .balance()
                    .checked_sub(self.block.balance())
                    .ok_or_else(|| anyhow!("send block {} increases balance", self.block.hash()))?;
                let info = PendingInfo::new(self.block.address(), self.block.token(), amount);
                pending.put(self.txn, &PendingKey::for_send_block(self.block), &info)?;
            }
            BlockType::Open | BlockType::Receive | BlockType::ContractReward => {
                pending.delete(self.txn, &PendingKey::for_receive_block(self.block))?;
            }
            BlockType::ContractSend => {
                if let Some((key, info)) = contract_pending {
                    debug!(address = %key.address, hash = %key.hash, "contract pending added");
                    pending.put(self.txn, &key, &info)?;
                }
            }
            BlockType::Change | BlockType::Online => {}
        }
        Ok(())
    }

    fn update_frontier(&mut self, token_meta: Option<&TokenMeta>) -> anyhow::Result<()> {
        let frontier_store = &self.ledger.store.frontier;
        let hash = self.block.hash();
        let frontier = match token_meta {
            Some(tm) => {
                let old = frontier_store
                    .get(&*self.txn, &tm.header)?
                    .ok_or_else(|| anyhow!("frontier {} not found", tm.header))?;
                frontier_store.delete(self.txn, &old.header_block)?;
                Frontier::new(hash, tm.open_block)
            }
            None => Frontier::new(hash, hash),
        };
        frontier_store.put(self.txn, &frontier)
    }

    fn update_account_meta(
        &mut self,
        account_meta: Option<AccountMeta>,
        token_meta: Option<TokenMeta>,
    ) -> anyhow::Result<()> {
        let block = self.block;
        let hash = block.hash();
        let modified = seconds_since_epoch();
        let mut account_meta = account_meta.unwrap_or_else(|| AccountMeta::new(block.address()));
        let token_meta = match token_meta {
            Some(tm) => TokenMeta {
                header: hash,
                representative: block.representative(),
                balance: block.balance(),
                block_count: tm.block_count + 1,
                modified,
                ..tm
            },
            None => TokenMeta {
                token: block.token(),
                header: hash,
                representative: block.representative(),
                open_block: hash,
                balance: block.balance(),
                block_count: 1,
                belong_to: block.address(),
                modified,
            },
        };
        account_meta.upsert_token(token_meta);

        if self.is_chain_token() {
            account_meta.coin_balance = block.balance();
            account_meta.coin_vote = block.vote();
            account_meta.coin_network = block.network();
            account_meta.coin_storage = block.storage();
            account_meta.coin_oracle = block.oracle();
        }
        self.ledger.store.account.put(self.txn, &account_meta)
    }
}
