#[macro_use]
extern crate anyhow;

mod account_store;
mod block_store;
mod contract_store;
mod frontier_store;
mod key_prefix;
mod lmdb_config;
mod lmdb_env;
mod pending_store;
mod representation_store;
mod store;
mod transaction;
mod unchecked_store;

pub use account_store::LmdbAccountStore;
pub use block_store::LmdbBlockStore;
pub use contract_store::LmdbContractStore;
pub use frontier_store::LmdbFrontierStore;
pub use key_prefix::{key_of_parts, KeyPrefix};
pub use lmdb_config::{LmdbConfig, SyncStrategy};
pub use lmdb_env::{DeleteEvent, LmdbEnv, PutEvent, TestDbFile, TestLmdbEnv, LEDGER_DATABASE};
pub use pending_store::LmdbPendingStore;
pub use representation_store::LmdbRepresentationStore;
pub use store::{LmdbStore, LmdbStoreBuilder};
pub use transaction::{LmdbReadTransaction, LmdbWriteTransaction, Transaction};
pub use unchecked_store::{LmdbUncheckedStore, UncheckedBlockExists};
