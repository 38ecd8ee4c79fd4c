/// Handle of a named database, either a real dbi or the id of a nulled database
#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub struct LmdbDatabase(DatabaseType);

impl LmdbDatabase {
    pub const fn new(db: lmdb::Database) -> Self {
        Self(DatabaseType::Real(db))
    }

    pub const fn new_null(id: u32) -> Self {
        Self(DatabaseType::Nulled(id))
    }

    pub fn as_real(&self) -> lmdb::Database {
        match self.0 {
            DatabaseType::Real(db) => db,
            DatabaseType::Nulled(_) => panic!("database handle is not a real handle"),
        }
    }

    pub fn as_nulled(&self) -> u32 {
        match self.0 {
            DatabaseType::Nulled(id) => id,
            DatabaseType::Real(_) => panic!("database handle is not a nulled handle"),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum DatabaseType {
    Real(lmdb::Database),
    Nulled(u32),
}
