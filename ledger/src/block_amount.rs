use rsdag_core::{Amount, BlockType, StateBlock};
use rsdag_store_lmdb::{LmdbStore, Transaction};

/// Amount moved by a block, relative to its previous block
pub fn calculate_amount(
    store: &LmdbStore,
    txn: &dyn Transaction,
    block: &StateBlock,
) -> anyhow::Result<Amount> {
    let previous = || -> anyhow::Result<StateBlock> {
        store
            .block
            .get(txn, &block.previous())?
            .ok_or_else(|| anyhow!("previous block {} not found", block.previous()))
    };
    let amount = match block.block_type() {
        BlockType::Open => Some(block.balance()),
        BlockType::Send => previous()?.balance().checked_sub(block.balance()),
        BlockType::Receive => block.balance().checked_sub(previous()?.balance()),
        BlockType::Change | BlockType::Online => Some(Amount::zero()),
        BlockType::ContractSend => {
            let total = block.total_balance();
            if block.is_open() {
                total
            } else {
                previous()?
                    .total_balance()
                    .zip(total)
                    .and_then(|(previous, total)| previous.checked_sub(total))
            }
        }
        BlockType::ContractReward => {
            if block.is_open() {
                Some(block.balance())
            } else {
                block.balance().checked_sub(previous()?.balance())
            }
        }
    };
    amount.ok_or_else(|| anyhow!("invalid amount in block {}", block.hash()))
}
