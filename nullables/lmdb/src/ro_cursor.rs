use crate::{LmdbDatabase, NullEntries, Result};
use lmdb::Cursor;
use lmdb_sys::{MDB_FIRST, MDB_NEXT, MDB_SET_RANGE};
use std::{cell::Cell, ffi::c_uint, ops::Bound};

pub struct RoCursor<'txn>(CursorStrategy<'txn>);

enum CursorStrategy<'txn> {
    Real(lmdb::RoCursor<'txn>),
    Nulled(NullCursor<'txn>),
}

struct NullCursor<'txn> {
    entries: &'txn NullEntries,
    database: u32,
    current: Cell<Option<&'txn [u8]>>,
}

impl<'txn> RoCursor<'txn> {
    pub(crate) fn new(cursor: lmdb::RoCursor<'txn>) -> Self {
        Self(CursorStrategy::Real(cursor))
    }

    pub(crate) fn new_null(entries: &'txn NullEntries, database: LmdbDatabase) -> Self {
        Self(CursorStrategy::Nulled(NullCursor {
            entries,
            database: database.as_nulled(),
            current: Cell::new(None),
        }))
    }

    /// Same contract as `lmdb::Cursor::get`. The nulled cursor supports
    /// `MDB_FIRST`, `MDB_NEXT` and `MDB_SET_RANGE`.
    pub fn get(
        &self,
        key: Option<&[u8]>,
        data: Option<&[u8]>,
        op: c_uint,
    ) -> Result<(Option<&'txn [u8]>, &'txn [u8])> {
        match &self.0 {
            CursorStrategy::Real(cursor) => cursor.get(key, data, op),
            CursorStrategy::Nulled(cursor) => cursor.get(key, op),
        }
    }
}

impl<'txn> NullCursor<'txn> {
    fn get(&self, key: Option<&[u8]>, op: c_uint) -> Result<(Option<&'txn [u8]>, &'txn [u8])> {
        let start = match (op, self.current.get()) {
            (MDB_FIRST, _) | (MDB_NEXT, None) => Bound::Included((self.database, Vec::new())),
            (MDB_NEXT, Some(current)) => Bound::Excluded((self.database, current.to_vec())),
            (MDB_SET_RANGE, _) => {
                let key = key.ok_or(lmdb::Error::Invalid)?;
                Bound::Included((self.database, key.to_vec()))
            }
            _ => return Err(lmdb::Error::Invalid),
        };

        let found = self
            .entries
            .range((start, Bound::Unbounded))
            .next()
            .filter(|((db, _), _)| *db == self.database);

        match found {
            Some(((_, k), v)) => {
                self.current.set(Some(k.as_slice()));
                Ok((Some(k.as_slice()), v.as_slice()))
            }
            None => Err(lmdb::Error::NotFound),
        }
    }
}
