//! Thin wrapper around LMDB that can be swapped for an in-memory environment.
//!
//! The nulled environment keeps all databases in one ordered map. Readers work on an
//! immutable snapshot, the single writer on a private copy that replaces the snapshot on commit.

mod configured_database;
mod database;
mod environment;
mod ro_cursor;
mod ro_transaction;
mod rw_transaction;

pub use configured_database::*;
pub use database::*;
pub use environment::*;
pub use lmdb::{DatabaseFlags, EnvironmentFlags, Error, WriteFlags};
pub use ro_cursor::*;
pub use ro_transaction::*;
pub use rw_transaction::*;

use std::collections::BTreeMap;

/// Content of a nulled environment: (database id, key) -> value
pub(crate) type NullEntries = BTreeMap<(u32, Vec<u8>), Vec<u8>>;

pub type Result<T> = lmdb::Result<T>;
