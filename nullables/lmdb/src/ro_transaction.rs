use crate::{LmdbDatabase, NullEntries, Result, RoCursor};
use lmdb::Transaction;
use std::sync::Arc;

pub struct RoTransaction<'env>(RoStrategy<'env>);

enum RoStrategy<'env> {
    Real(lmdb::RoTransaction<'env>),
    Nulled(Arc<NullEntries>),
}

impl<'env> RoTransaction<'env> {
    pub(crate) fn new(txn: lmdb::RoTransaction<'env>) -> Self {
        Self(RoStrategy::Real(txn))
    }

    pub(crate) fn new_null(snapshot: Arc<NullEntries>) -> Self {
        Self(RoStrategy::Nulled(snapshot))
    }

    pub fn get(&self, database: LmdbDatabase, key: &[u8]) -> Result<&[u8]> {
        match &self.0 {
            RoStrategy::Real(txn) => txn.get(database.as_real(), &key),
            RoStrategy::Nulled(entries) => null_get(entries, database, key),
        }
    }

    pub fn open_ro_cursor(&self, database: LmdbDatabase) -> Result<RoCursor<'_>> {
        match &self.0 {
            RoStrategy::Real(txn) => txn.open_ro_cursor(database.as_real()).map(RoCursor::new),
            RoStrategy::Nulled(entries) => Ok(RoCursor::new_null(entries, database)),
        }
    }

    pub fn commit(self) -> Result<()> {
        match self.0 {
            RoStrategy::Real(txn) => txn.commit(),
            RoStrategy::Nulled(_) => Ok(()),
        }
    }
}

pub(crate) fn null_get<'a>(
    entries: &'a NullEntries,
    database: LmdbDatabase,
    key: &[u8],
) -> Result<&'a [u8]> {
    entries
        .get(&(database.as_nulled(), key.to_vec()))
        .map(|value| value.as_slice())
        .ok_or(lmdb::Error::NotFound)
}
