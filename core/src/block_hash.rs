use crate::BlockHash;
use blake2::{
    digest::{Update, VariableOutput},
    Blake2bVar,
};

pub struct BlockHashBuilder {
    blake: Blake2bVar,
}

impl Default for BlockHashBuilder {
    fn default() -> Self {
        Self {
            blake: Blake2bVar::new(32).unwrap(),
        }
    }
}

impl BlockHashBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update(mut self, data: impl AsRef<[u8]>) -> Self {
        self.blake.update(data.as_ref());
        self
    }

    pub fn build(self) -> BlockHash {
        let mut hash_bytes = [0u8; 32];
        self.blake.finalize_variable(&mut hash_bytes).unwrap();
        BlockHash::from_bytes(hash_bytes)
    }
}

/// blake2b-256 of arbitrary data, e.g. a data directory path
pub fn hash_data(data: impl AsRef<[u8]>) -> BlockHash {
    BlockHashBuilder::new().update(data).build()
}
