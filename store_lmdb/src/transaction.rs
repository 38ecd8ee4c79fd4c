use crate::LmdbEnv;
use lmdb::WriteFlags;
use lmdb_sys::{MDB_FIRST, MDB_NEXT, MDB_SET_RANGE};
use rsdag_nullable_lmdb::{LmdbDatabase, RoCursor, RoTransaction, RwTransaction};

/// Read view of the ledger database
pub trait Transaction {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<&[u8]>>;

    fn exists(&self, key: &[u8]) -> anyhow::Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Visits all entries whose key starts with `prefix`, in key order
    fn iterate(
        &self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
    ) -> anyhow::Result<()>;

    fn count(&self, prefix: &[u8]) -> anyhow::Result<u64> {
        let mut count = 0;
        self.iterate(prefix, &mut |_, _| {
            count += 1;
            Ok(())
        })?;
        Ok(count)
    }
}

fn map_get(result: lmdb::Result<&[u8]>) -> anyhow::Result<Option<&[u8]>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(lmdb::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn scan_prefix(
    cursor: &RoCursor,
    prefix: &[u8],
    visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    // LMDB rejects zero length keys for MDB_SET_RANGE
    let mut current = if prefix.is_empty() {
        cursor.get(None, None, MDB_FIRST)
    } else {
        cursor.get(Some(prefix), None, MDB_SET_RANGE)
    };

    loop {
        match current {
            Ok((Some(key), value)) if key.starts_with(prefix) => visitor(key, value)?,
            Ok(_) | Err(lmdb::Error::NotFound) => break,
            Err(e) => return Err(e.into()),
        }
        current = cursor.get(None, None, MDB_NEXT);
    }
    Ok(())
}

pub struct LmdbReadTransaction<'env> {
    txn: RoTransaction<'env>,
    database: LmdbDatabase,
}

impl<'env> LmdbReadTransaction<'env> {
    pub(crate) fn new(txn: RoTransaction<'env>, database: LmdbDatabase) -> Self {
        Self { txn, database }
    }

    pub fn commit(self) -> anyhow::Result<()> {
        Ok(self.txn.commit()?)
    }
}

impl<'env> Transaction for LmdbReadTransaction<'env> {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<&[u8]>> {
        map_get(self.txn.get(self.database, key))
    }

    fn iterate(
        &self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let cursor = self.txn.open_ro_cursor(self.database)?;
        scan_prefix(&cursor, prefix, visitor)
    }
}

/// The only writer of the environment. Dropping it without `commit` discards all changes.
pub struct LmdbWriteTransaction<'env> {
    txn: RwTransaction<'env>,
    env: &'env LmdbEnv,
}

impl<'env> LmdbWriteTransaction<'env> {
    pub(crate) fn new(txn: RwTransaction<'env>, env: &'env LmdbEnv) -> Self {
        Self { txn, env }
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        self.env.emit_put(key, value);
        self.txn
            .put(self.env.database(), key, value, WriteFlags::empty())?;
        Ok(())
    }

    /// Deleting a missing key is not an error
    pub fn delete(&mut self, key: &[u8]) -> anyhow::Result<()> {
        self.env.emit_delete(key);
        match self.txn.del(self.env.database(), key) {
            Ok(()) | Err(lmdb::Error::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn commit(self) -> anyhow::Result<()> {
        Ok(self.txn.commit()?)
    }
}

impl<'env> Transaction for LmdbWriteTransaction<'env> {
    fn get(&self, key: &[u8]) -> anyhow::Result<Option<&[u8]>> {
        map_get(self.txn.get(self.env.database(), key))
    }

    fn iterate(
        &self,
        prefix: &[u8],
        visitor: &mut dyn FnMut(&[u8], &[u8]) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let cursor = self.txn.open_ro_cursor(self.env.database())?;
        scan_prefix(&cursor, prefix, visitor)
    }
}
