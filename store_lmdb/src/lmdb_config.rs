#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SyncStrategy {
    /// Always flush to disk on commit. This is default.
    Always,
    /// Do a full sync once per transaction but skip the metadata page sync
    NosyncSafe,
    /// Let the OS decide when to flush to disk. On crash, the data may be lost.
    NosyncUnsafe,
    /// Like NosyncUnsafe with a writeable memory map
    NosyncUnsafeLargeMemory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LmdbConfig {
    pub sync: SyncStrategy,
    pub max_databases: u32,
    pub map_size: usize,
    pub max_readers: u32,
}

impl Default for LmdbConfig {
    fn default() -> Self {
        Self {
            sync: SyncStrategy::Always,
            max_databases: 4,
            map_size: 16 * 1024 * 1024 * 1024,
            max_readers: 126,
        }
    }
}
