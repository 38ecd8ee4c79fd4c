use crate::{
    config::{get_ledger_toml_config_path, LedgerConfig, LedgerToml},
    contracts::ContractRegistry,
    Ledger, LedgerConstants, ServiceContainer,
};
use anyhow::Context;
use rsdag_core::{hash_data, BlockHash};
use rsdag_store_lmdb::LmdbStore;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::info;

/// Everything that belongs to one data directory
pub struct ChainContext {
    pub id: BlockHash,
    pub data_dir: PathBuf,
    pub config: LedgerConfig,
    pub services: ServiceContainer,
}

impl ChainContext {
    /// Reads `config.toml` from `data_dir` if there is one
    pub fn new(data_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();
        let config_path = get_ledger_toml_config_path(&data_dir);
        let config = if config_path.exists() {
            let text = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {:?}", config_path))?;
            let toml: LedgerToml = toml::from_str(&text)
                .with_context(|| format!("parsing {:?}", config_path))?;
            LedgerConfig::from(&toml)
        } else {
            LedgerConfig::default()
        };

        Ok(Self {
            id: Self::id_of(&data_dir),
            data_dir,
            config,
            services: ServiceContainer::new(),
        })
    }

    fn id_of(data_dir: &Path) -> BlockHash {
        hash_data(data_dir.to_string_lossy().as_bytes())
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("ledger.ldb")
    }

    pub fn open_ledger(
        &self,
        constants: LedgerConstants,
        contracts: Arc<ContractRegistry>,
    ) -> anyhow::Result<Arc<Ledger>> {
        let path = self.ledger_path();
        let store = LmdbStore::open(&path)
            .config(&self.config.lmdb)
            .build()
            .with_context(|| format!("opening ledger at {:?}", path))?;
        let ledger = Ledger::new(Arc::new(store), constants, contracts, self.config.clone())?;
        info!(path = ?path, "ledger opened");
        Ok(Arc::new(ledger))
    }
}

/// One context per data directory
#[derive(Default)]
pub struct ChainContextRegistry {
    contexts: Mutex<HashMap<BlockHash, Arc<ChainContext>>>,
}

impl ChainContextRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get_or_create(&self, data_dir: impl Into<PathBuf>) -> anyhow::Result<Arc<ChainContext>> {
        let data_dir = data_dir.into();
        let id = ChainContext::id_of(&data_dir);
        let mut contexts = self.contexts.lock().unwrap();
        if let Some(context) = contexts.get(&id) {
            return Ok(Arc::clone(context));
        }
        let context = Arc::new(ChainContext::new(data_dir)?);
        contexts.insert(id, Arc::clone(&context));
        Ok(context)
    }

    /// Stops the services of the context and forgets it
    pub fn remove(&self, data_dir: impl AsRef<Path>) -> anyhow::Result<Option<Arc<ChainContext>>> {
        let id = ChainContext::id_of(data_dir.as_ref());
        let removed = self.contexts.lock().unwrap().remove(&id);
        if let Some(context) = &removed {
            context.services.stop_all()?;
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
