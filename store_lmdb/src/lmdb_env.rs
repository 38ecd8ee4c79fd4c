use crate::{LmdbConfig, LmdbReadTransaction, LmdbWriteTransaction, SyncStrategy};
use lmdb::{DatabaseFlags, EnvironmentFlags};
use rsdag_nullable_lmdb::{
    ConfiguredDatabase, EnvironmentOptions, LmdbDatabase, LmdbEnvironment,
};
use rsdag_output_tracker::{OutputListenerMt, OutputTrackerMt};
use std::{
    fs::{create_dir_all, set_permissions, Permissions},
    ops::Deref,
    os::unix::prelude::PermissionsExt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

/// Name of the single database that holds all prefixed tables
pub const LEDGER_DATABASE: &str = "ledger";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutEvent {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteEvent {
    pub key: Vec<u8>,
}

pub struct LmdbEnv {
    pub environment: LmdbEnvironment,
    database: LmdbDatabase,
    put_listener: OutputListenerMt<PutEvent>,
    delete_listener: OutputListenerMt<DeleteEvent>,
}

impl LmdbEnv {
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::with_config(path, &LmdbConfig::default())
    }

    pub fn with_config(path: impl AsRef<Path>, config: &LmdbConfig) -> anyhow::Result<Self> {
        let path = path.as_ref();
        try_create_parent_dir(path)?;

        let mut flags = EnvironmentFlags::NO_SUB_DIR
            | EnvironmentFlags::NO_TLS
            | EnvironmentFlags::NO_READAHEAD;
        match config.sync {
            SyncStrategy::Always => {}
            SyncStrategy::NosyncSafe => flags |= EnvironmentFlags::NO_META_SYNC,
            SyncStrategy::NosyncUnsafe => flags |= EnvironmentFlags::NO_SYNC,
            SyncStrategy::NosyncUnsafeLargeMemory => {
                flags |= EnvironmentFlags::NO_SYNC
                    | EnvironmentFlags::WRITE_MAP
                    | EnvironmentFlags::MAP_ASYNC
            }
        }

        let mut options = EnvironmentOptions::new(path);
        options.max_dbs = config.max_databases;
        options.map_size = config.map_size;
        options.max_readers = config.max_readers;
        options.flags = flags;

        let environment = LmdbEnvironment::new(&options)?;
        let database = environment.create_db(Some(LEDGER_DATABASE), DatabaseFlags::empty())?;
        debug!(path = %path.display(), "opened ledger database");
        Ok(Self::from_parts(environment, database))
    }

    /// In-memory environment for tests
    pub fn new_null() -> Self {
        Self::new_null_with(ConfiguredDatabase::new(LEDGER_DATABASE))
    }

    /// In-memory environment preloaded with `entries`
    pub fn new_null_with(entries: ConfiguredDatabase) -> Self {
        let environment = LmdbEnvironment::new_null_with(vec![ConfiguredDatabase {
            name: LEDGER_DATABASE.to_owned(),
            entries: entries.entries,
        }]);
        // the preloaded ledger database is the first and only nulled database
        Self::from_parts(environment, LmdbDatabase::new_null(0))
    }

    fn from_parts(environment: LmdbEnvironment, database: LmdbDatabase) -> Self {
        Self {
            environment,
            database,
            put_listener: OutputListenerMt::new(),
            delete_listener: OutputListenerMt::new(),
        }
    }

    pub fn database(&self) -> LmdbDatabase {
        self.database
    }

    pub fn tx_begin_read(&self) -> anyhow::Result<LmdbReadTransaction<'_>> {
        Ok(LmdbReadTransaction::new(
            self.environment.begin_ro_txn()?,
            self.database,
        ))
    }

    /// Blocks while another write transaction is open
    pub fn tx_begin_write(&self) -> anyhow::Result<LmdbWriteTransaction<'_>> {
        Ok(LmdbWriteTransaction::new(
            self.environment.begin_rw_txn()?,
            self,
        ))
    }

    pub fn track_puts(&self) -> Arc<OutputTrackerMt<PutEvent>> {
        self.put_listener.track()
    }

    pub fn track_deletions(&self) -> Arc<OutputTrackerMt<DeleteEvent>> {
        self.delete_listener.track()
    }

    pub(crate) fn emit_put(&self, key: &[u8], value: &[u8]) {
        if self.put_listener.is_tracked() {
            self.put_listener.emit(PutEvent {
                key: key.to_vec(),
                value: value.to_vec(),
            });
        }
    }

    pub(crate) fn emit_delete(&self, key: &[u8]) {
        if self.delete_listener.is_tracked() {
            self.delete_listener.emit(DeleteEvent { key: key.to_vec() });
        }
    }
}

impl Drop for LmdbEnv {
    fn drop(&mut self) {
        let _ = self.environment.sync(true);
    }
}

fn try_create_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if parent != Path::new("") && !parent.is_dir() {
            create_dir_all(parent)?;
            set_permissions(parent, Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

/// A database file in /tmp that is removed on drop
pub struct TestDbFile {
    pub path: PathBuf,
}

impl TestDbFile {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Path::new("/tmp").join(path),
        }
    }

    pub fn random() -> Self {
        Self::new(Self::temp_file_name())
    }

    fn temp_file_name() -> PathBuf {
        PathBuf::from(format!("{}.ldb", uuid::Uuid::new_v4().simple()))
    }

    fn lock_file_path(&self) -> PathBuf {
        let mut lock_file_path = self.path.parent().unwrap().to_owned();
        let mut fname = self.path.file_name().unwrap().to_os_string();
        fname.push("-lock");
        lock_file_path.push(fname);
        lock_file_path
    }
}

impl Drop for TestDbFile {
    fn drop(&mut self) {
        if self.path.exists() {
            std::fs::remove_file(&self.path).unwrap();
            let lock_file = self.lock_file_path();
            if lock_file.exists() {
                std::fs::remove_file(&lock_file).unwrap();
            }
        }
    }
}

/// Real LMDB environment on a temporary file
pub struct TestLmdbEnv {
    env: Arc<LmdbEnv>,
    _file: TestDbFile,
}

impl TestLmdbEnv {
    pub fn new() -> Self {
        let file = TestDbFile::random();
        let config = LmdbConfig {
            map_size: 64 * 1024 * 1024,
            ..Default::default()
        };
        let env = Arc::new(LmdbEnv::with_config(&file.path, &config).unwrap());
        Self { _file: file, env }
    }

    pub fn env(&self) -> Arc<LmdbEnv> {
        self.env.clone()
    }
}

impl Default for TestLmdbEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestLmdbEnv {
    type Target = LmdbEnv;

    fn deref(&self) -> &Self::Target {
        &self.env
    }
}
