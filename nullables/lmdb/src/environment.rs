use crate::{
    ConfiguredDatabase, LmdbDatabase, NullEntries, Result, RoTransaction, RwTransaction,
};
use lmdb::{DatabaseFlags, EnvironmentFlags};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

#[derive(Clone, Debug)]
pub struct EnvironmentOptions {
    pub path: PathBuf,
    pub max_dbs: u32,
    pub map_size: usize,
    pub max_readers: u32,
    pub flags: EnvironmentFlags,
    pub file_mode: u32,
}

impl EnvironmentOptions {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_dbs: 1,
            map_size: 1024 * 1024 * 1024,
            max_readers: 126,
            flags: EnvironmentFlags::NO_SUB_DIR | EnvironmentFlags::NO_TLS,
            file_mode: 0o600,
        }
    }
}

pub struct LmdbEnvironment {
    strategy: EnvironmentStrategy,
}

enum EnvironmentStrategy {
    Real(lmdb::Environment),
    Nulled(EnvironmentStub),
}

impl LmdbEnvironment {
    pub fn new(options: &EnvironmentOptions) -> Result<Self> {
        let env = lmdb::Environment::new()
            .set_max_dbs(options.max_dbs)
            .set_map_size(options.map_size)
            .set_max_readers(options.max_readers)
            .set_flags(options.flags)
            .open_with_permissions(&options.path, options.file_mode as _)?;
        Ok(Self {
            strategy: EnvironmentStrategy::Real(env),
        })
    }

    pub fn new_null() -> Self {
        Self::new_null_with(Vec::new())
    }

    pub fn new_null_with(databases: Vec<ConfiguredDatabase>) -> Self {
        Self {
            strategy: EnvironmentStrategy::Nulled(EnvironmentStub::new(databases)),
        }
    }

    pub fn is_nulled(&self) -> bool {
        matches!(self.strategy, EnvironmentStrategy::Nulled(_))
    }

    pub fn create_db(&self, name: Option<&str>, flags: DatabaseFlags) -> Result<LmdbDatabase> {
        match &self.strategy {
            EnvironmentStrategy::Real(env) => env.create_db(name, flags).map(LmdbDatabase::new),
            EnvironmentStrategy::Nulled(stub) => Ok(stub.database(name.unwrap_or_default())),
        }
    }

    pub fn begin_ro_txn(&self) -> Result<RoTransaction<'_>> {
        match &self.strategy {
            EnvironmentStrategy::Real(env) => env.begin_ro_txn().map(RoTransaction::new),
            EnvironmentStrategy::Nulled(stub) => Ok(RoTransaction::new_null(stub.snapshot())),
        }
    }

    /// Blocks while another write transaction is open
    pub fn begin_rw_txn(&self) -> Result<RwTransaction<'_>> {
        match &self.strategy {
            EnvironmentStrategy::Real(env) => env.begin_rw_txn().map(RwTransaction::new),
            EnvironmentStrategy::Nulled(stub) => {
                let guard = stub.writer.lock().map_err(|_| lmdb::Error::Panic)?;
                let entries = stub.snapshot().as_ref().clone();
                Ok(RwTransaction::new_null(&stub.entries, guard, entries))
            }
        }
    }

    pub fn sync(&self, force: bool) -> Result<()> {
        match &self.strategy {
            EnvironmentStrategy::Real(env) => env.sync(force),
            EnvironmentStrategy::Nulled(_) => Ok(()),
        }
    }
}

struct EnvironmentStub {
    names: Mutex<Vec<String>>,
    entries: RwLock<Arc<NullEntries>>,
    writer: Mutex<()>,
}

impl EnvironmentStub {
    fn new(databases: Vec<ConfiguredDatabase>) -> Self {
        let mut names = Vec::new();
        let mut entries = NullEntries::new();
        for db in databases {
            let id = names.len() as u32;
            names.push(db.name);
            for (key, value) in db.entries {
                entries.insert((id, key), value);
            }
        }
        Self {
            names: Mutex::new(names),
            entries: RwLock::new(Arc::new(entries)),
            writer: Mutex::new(()),
        }
    }

    fn database(&self, name: &str) -> LmdbDatabase {
        let mut names = self.names.lock().unwrap();
        let id = match names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                names.push(name.to_owned());
                names.len() - 1
            }
        };
        LmdbDatabase::new_null(id as u32)
    }

    fn snapshot(&self) -> Arc<NullEntries> {
        self.entries.read().unwrap().clone()
    }
}
