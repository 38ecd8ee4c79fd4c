/// First byte of every key in the ledger database. Each prefix is one logical table.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPrefix {
    StateBlock = 1,
    AccountMeta = 2,
    Pending = 3,
    Frontier = 4,
    Representation = 5,
    UncheckedBlockPrevious = 6,
    UncheckedBlockLink = 7,
    UncheckedTokenInfo = 8,
    GapPublish = 9,
    UncheckedPovHeight = 10,
    GapPovHeight = 11,
    GapDoDSettleState = 12,
    ContractStorage = 100,
}

impl KeyPrefix {
    pub fn as_bytes(&self) -> [u8; 1] {
        [*self as u8]
    }
}

/// Concatenates the prefix byte and all parts
pub fn key_of_parts(prefix: KeyPrefix, parts: &[&[u8]]) -> Vec<u8> {
    let len = 1 + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.push(prefix as u8);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}
