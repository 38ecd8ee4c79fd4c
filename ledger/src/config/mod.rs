mod ledger_config;
mod ledger_toml;
mod lmdb_config_toml;

pub use ledger_config::{get_ledger_toml_config_path, LedgerConfig};
pub use ledger_toml::LedgerToml;
pub use lmdb_config_toml::LmdbConfigToml;
