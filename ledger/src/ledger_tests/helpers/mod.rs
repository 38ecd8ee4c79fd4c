mod account_block_factory;
mod ledger_context;

pub(crate) use account_block_factory::AccountBlockFactory;
pub(crate) use ledger_context::LedgerContext;
pub(crate) use test_contracts::*;
