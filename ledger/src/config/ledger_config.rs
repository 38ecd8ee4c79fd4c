use crate::MINTAGE_ADDRESS;
use rsdag_core::Account;
use rsdag_store_lmdb::LmdbConfig;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Contracts whose missing storage on receive is a `GapTokenInfo` instead of an error
    pub gap_token_info_contracts: Vec<Account>,
    pub lmdb: LmdbConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            gap_token_info_contracts: vec![*MINTAGE_ADDRESS],
            lmdb: LmdbConfig::default(),
        }
    }
}

pub fn get_ledger_toml_config_path(data_path: impl AsRef<Path>) -> PathBuf {
    data_path.as_ref().join("config.toml")
}
