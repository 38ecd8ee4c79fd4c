use crate::{
    utils::{BufferWriter, Deserialize, FixedSizeSerialize, Serialize, Stream},
    Account, Amount, BlockHash, StateBlock, TokenId,
};

/// Identifies a receivable amount: the receiving address and the hash of the send block
#[derive(Default, PartialEq, Eq, Debug, Clone, Hash, PartialOrd, Ord)]
pub struct PendingKey {
    pub address: Account,
    pub hash: BlockHash,
}

impl PendingKey {
    pub fn new(address: Account, hash: BlockHash) -> Self {
        Self { address, hash }
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut result = [0; 64];
        result[..32].copy_from_slice(self.address.as_bytes());
        result[32..].copy_from_slice(self.hash.as_bytes());
        result
    }

    pub fn for_send_block(block: &StateBlock) -> Self {
        Self::new(block.link().into(), block.hash())
    }

    /// Receive, open and contract reward blocks consume the pending entry named by their link
    pub fn for_receive_block(block: &StateBlock) -> Self {
        Self::new(block.address(), block.link().into())
    }

    pub fn new_test_instance() -> Self {
        Self::new(Account::from(1), BlockHash::from(2))
    }
}

impl Serialize for PendingKey {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.address.serialize(writer);
        self.hash.serialize(writer);
    }
}

impl FixedSizeSerialize for PendingKey {
    fn serialized_size() -> usize {
        Account::serialized_size() + BlockHash::serialized_size()
    }
}

impl Deserialize for PendingKey {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self::Target> {
        let address = Account::deserialize(stream)?;
        let hash = BlockHash::deserialize(stream)?;
        Ok(Self { address, hash })
    }
}

/// What a pending entry carries: the sender, the token and the receivable amount
#[derive(PartialEq, Eq, Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PendingInfo {
    pub source: Account,
    pub token: TokenId,
    pub amount: Amount,
}

impl PendingInfo {
    pub fn new(source: Account, token: TokenId, amount: Amount) -> Self {
        Self {
            source,
            token,
            amount,
        }
    }

    pub fn new_test_instance() -> Self {
        Self::new(Account::from(3), TokenId::from(4), Amount::raw(5))
    }
}

impl Serialize for PendingInfo {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.source.serialize(writer);
        self.token.serialize(writer);
        self.amount.serialize(writer);
    }
}

impl FixedSizeSerialize for PendingInfo {
    fn serialized_size() -> usize {
        Account::serialized_size() + TokenId::serialized_size() + Amount::serialized_size()
    }
}

impl Deserialize for PendingInfo {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        Ok(Self {
            source: Account::deserialize(stream)?,
            token: TokenId::deserialize(stream)?,
            amount: Amount::deserialize(stream)?,
        })
    }
}
