use crate::{
    LmdbAccountStore, LmdbBlockStore, LmdbConfig, LmdbContractStore, LmdbEnv, LmdbFrontierStore,
    LmdbPendingStore, LmdbReadTransaction, LmdbRepresentationStore, LmdbUncheckedStore,
    LmdbWriteTransaction,
};
use std::{path::Path, sync::Arc};

pub struct LmdbStore {
    pub env: Arc<LmdbEnv>,
    pub block: Arc<LmdbBlockStore>,
    pub account: Arc<LmdbAccountStore>,
    pub pending: Arc<LmdbPendingStore>,
    pub frontier: Arc<LmdbFrontierStore>,
    pub representation: Arc<LmdbRepresentationStore>,
    pub unchecked: Arc<LmdbUncheckedStore>,
    pub contract: Arc<LmdbContractStore>,
}

pub struct LmdbStoreBuilder<'a> {
    path: &'a Path,
    config: Option<&'a LmdbConfig>,
}

impl<'a> LmdbStoreBuilder<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, config: None }
    }

    pub fn config(mut self, config: &'a LmdbConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> anyhow::Result<LmdbStore> {
        let default_config = LmdbConfig::default();
        let config = self.config.unwrap_or(&default_config);
        let env = LmdbEnv::with_config(self.path, config)?;
        Ok(LmdbStore::with_env(Arc::new(env)))
    }
}

impl LmdbStore {
    pub fn open(path: &Path) -> LmdbStoreBuilder<'_> {
        LmdbStoreBuilder::new(path)
    }

    pub fn new_null() -> Self {
        Self::with_env(Arc::new(LmdbEnv::new_null()))
    }

    pub fn with_env(env: Arc<LmdbEnv>) -> Self {
        Self {
            block: Arc::new(LmdbBlockStore::new(env.clone())),
            account: Arc::new(LmdbAccountStore::new(env.clone())),
            pending: Arc::new(LmdbPendingStore::new(env.clone())),
            frontier: Arc::new(LmdbFrontierStore::new(env.clone())),
            representation: Arc::new(LmdbRepresentationStore::new(env.clone())),
            unchecked: Arc::new(LmdbUncheckedStore::new(env.clone())),
            contract: Arc::new(LmdbContractStore::new(env.clone())),
            env,
        }
    }

    pub fn tx_begin_read(&self) -> anyhow::Result<LmdbReadTransaction<'_>> {
        self.env.tx_begin_read()
    }

    pub fn tx_begin_write(&self) -> anyhow::Result<LmdbWriteTransaction<'_>> {
        self.env.tx_begin_write()
    }
}
