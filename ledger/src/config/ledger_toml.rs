use super::{LedgerConfig, LmdbConfigToml};
use rsdag_core::Account;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct LedgerToml {
    pub gap_token_info_contracts: Option<Vec<Account>>,
    pub lmdb: Option<LmdbConfigToml>,
}

impl Default for LedgerToml {
    fn default() -> Self {
        let config = LedgerConfig::default();
        (&config).into()
    }
}

impl From<&LedgerToml> for LedgerConfig {
    fn from(toml: &LedgerToml) -> Self {
        let mut config = LedgerConfig::default();

        if let Some(contracts) = &toml.gap_token_info_contracts {
            config.gap_token_info_contracts = contracts.clone();
        }
        if let Some(lmdb) = &toml.lmdb {
            config.lmdb = lmdb.into();
        }
        config
    }
}

impl From<&LedgerConfig> for LedgerToml {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            gap_token_info_contracts: Some(config.gap_token_info_contracts.clone()),
            lmdb: Some((&config.lmdb).into()),
        }
    }
}
