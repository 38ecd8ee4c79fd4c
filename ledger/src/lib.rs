#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate num_derive;

mod block_amount;
mod block_insertion;
mod chain_context;
mod config;
pub mod contracts;
mod ledger;
mod ledger_constants;
mod process_result;
mod service_container;
mod unchecked_resolver;
mod write_queue;

#[cfg(test)]
mod ledger_tests;

pub use block_amount::calculate_amount;
pub use chain_context::{ChainContext, ChainContextRegistry};
pub use config::{get_ledger_toml_config_path, LedgerConfig, LedgerToml, LmdbConfigToml};
pub use ledger::Ledger;
pub use ledger_constants::{
    system_address, LedgerConstants, CHAIN_TOKEN, DEV_GENESIS_ACCOUNT, DEV_GENESIS_HASH,
    DEV_GENESIS_KEY, LEDGER_CONSTANTS_STUB, MINTAGE_ADDRESS,
};
pub use process_result::ProcessResult;
pub use service_container::{Service, ServiceContainer};
pub use unchecked_resolver::UncheckedBlockResolver;
pub use write_queue::{WriteGuard, WriteQueue, Writer};
