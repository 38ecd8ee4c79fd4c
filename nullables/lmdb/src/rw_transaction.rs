use crate::{ro_transaction::null_get, LmdbDatabase, NullEntries, Result, RoCursor};
use lmdb::{Transaction, WriteFlags};
use std::sync::{Arc, MutexGuard, RwLock};

pub struct RwTransaction<'env>(RwStrategy<'env>);

enum RwStrategy<'env> {
    Real(lmdb::RwTransaction<'env>),
    Nulled(NullWriter<'env>),
}

/// Holds the writer lock and a private copy of all entries until commit
struct NullWriter<'env> {
    target: &'env RwLock<Arc<NullEntries>>,
    _guard: MutexGuard<'env, ()>,
    entries: NullEntries,
}

impl<'env> RwTransaction<'env> {
    pub(crate) fn new(txn: lmdb::RwTransaction<'env>) -> Self {
        Self(RwStrategy::Real(txn))
    }

    pub(crate) fn new_null(
        target: &'env RwLock<Arc<NullEntries>>,
        guard: MutexGuard<'env, ()>,
        entries: NullEntries,
    ) -> Self {
        Self(RwStrategy::Nulled(NullWriter {
            target,
            _guard: guard,
            entries,
        }))
    }

    pub fn get(&self, database: LmdbDatabase, key: &[u8]) -> Result<&[u8]> {
        match &self.0 {
            RwStrategy::Real(txn) => txn.get(database.as_real(), &key),
            RwStrategy::Nulled(writer) => null_get(&writer.entries, database, key),
        }
    }

    pub fn open_ro_cursor(&self, database: LmdbDatabase) -> Result<RoCursor<'_>> {
        match &self.0 {
            RwStrategy::Real(txn) => txn.open_ro_cursor(database.as_real()).map(RoCursor::new),
            RwStrategy::Nulled(writer) => Ok(RoCursor::new_null(&writer.entries, database)),
        }
    }

    pub fn put(
        &mut self,
        database: LmdbDatabase,
        key: &[u8],
        data: &[u8],
        flags: WriteFlags,
    ) -> Result<()> {
        match &mut self.0 {
            RwStrategy::Real(txn) => txn.put(database.as_real(), &key, &data, flags),
            RwStrategy::Nulled(writer) => {
                let key = (database.as_nulled(), key.to_vec());
                if flags.contains(WriteFlags::NO_OVERWRITE) && writer.entries.contains_key(&key) {
                    return Err(lmdb::Error::KeyExist);
                }
                writer.entries.insert(key, data.to_vec());
                Ok(())
            }
        }
    }

    pub fn del(&mut self, database: LmdbDatabase, key: &[u8]) -> Result<()> {
        match &mut self.0 {
            RwStrategy::Real(txn) => txn.del(database.as_real(), &key, None),
            RwStrategy::Nulled(writer) => writer
                .entries
                .remove(&(database.as_nulled(), key.to_vec()))
                .map(|_| ())
                .ok_or(lmdb::Error::NotFound),
        }
    }

    pub fn commit(self) -> Result<()> {
        match self.0 {
            RwStrategy::Real(txn) => txn.commit(),
            RwStrategy::Nulled(writer) => {
                let mut target = writer.target.write().map_err(|_| lmdb::Error::Panic)?;
                *target = Arc::new(writer.entries);
                Ok(())
            }
        }
    }
}
