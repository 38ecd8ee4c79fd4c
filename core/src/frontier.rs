use crate::BlockHash;

/// Head of a token chain together with the block that opened it.
/// Stored as `header_block -> open_block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Frontier {
    pub header_block: BlockHash,
    pub open_block: BlockHash,
}

impl Frontier {
    pub fn new(header_block: BlockHash, open_block: BlockHash) -> Self {
        Self {
            header_block,
            open_block,
        }
    }
}
