use super::BlockType;
use crate::{
    utils::{read_var_bytes, serde_hex, write_var_bytes, BufferWriter, Deserialize, Serialize, Stream},
    Account, Amount, Benefit, BlockHash, BlockHashBuilder, KeyPair, Link, Root, Signature, TokenId,
};

/// Everything that goes into the block hash
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateHashables {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub token: TokenId,
    pub address: Account,
    pub balance: Amount,
    pub vote: Amount,
    pub network: Amount,
    pub storage: Amount,
    pub oracle: Amount,
    pub previous: BlockHash,
    pub link: Link,
    pub representative: Account,
    #[serde(with = "serde_hex", default)]
    pub data: Vec<u8>,
    #[serde(default)]
    pub pov_height: u64,
    #[serde(default)]
    pub timestamp: u64,
}

impl StateHashables {
    fn hash(&self) -> BlockHash {
        BlockHashBuilder::new()
            .update([self.block_type as u8])
            .update(self.token.as_bytes())
            .update(self.address.as_bytes())
            .update(self.balance.to_be_bytes())
            .update(self.vote.to_be_bytes())
            .update(self.network.to_be_bytes())
            .update(self.storage.to_be_bytes())
            .update(self.oracle.to_be_bytes())
            .update(self.previous.as_bytes())
            .update(self.link.as_bytes())
            .update(self.representative.as_bytes())
            .update(&self.data)
            .update(self.pov_height.to_be_bytes())
            .update(self.timestamp.to_be_bytes())
            .build()
    }
}

/// The single block record of an account/token chain.
///
/// The block type decides how `link` is interpreted: the destination account of a
/// send, the source send block of a receive/open, the contract address of a contract send
/// and the contract send block of a contract reward.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateBlock {
    #[serde(flatten)]
    hashables: StateHashables,
    work: u64,
    signature: Signature,
}

impl StateBlock {
    pub fn new(hashables: StateHashables, key: &KeyPair, work: u64) -> Self {
        let mut block = Self::new_unsigned(hashables, work);
        block.sign(key);
        block
    }

    /// Used for system blocks that bypass signature checks
    pub fn new_unsigned(hashables: StateHashables, work: u64) -> Self {
        Self {
            hashables,
            work,
            signature: Signature::new(),
        }
    }

    pub fn hash(&self) -> BlockHash {
        self.hashables.hash()
    }

    pub fn sign(&mut self, key: &KeyPair) {
        self.signature = key.sign(self.hash().as_bytes());
    }

    pub fn hashables(&self) -> &StateHashables {
        &self.hashables
    }

    pub fn block_type(&self) -> BlockType {
        self.hashables.block_type
    }

    pub fn token(&self) -> TokenId {
        self.hashables.token
    }

    pub fn address(&self) -> Account {
        self.hashables.address
    }

    pub fn balance(&self) -> Amount {
        self.hashables.balance
    }

    pub fn vote(&self) -> Amount {
        self.hashables.vote
    }

    pub fn network(&self) -> Amount {
        self.hashables.network
    }

    pub fn storage(&self) -> Amount {
        self.hashables.storage
    }

    pub fn oracle(&self) -> Amount {
        self.hashables.oracle
    }

    pub fn previous(&self) -> BlockHash {
        self.hashables.previous
    }

    pub fn link(&self) -> Link {
        self.hashables.link
    }

    pub fn representative(&self) -> Account {
        self.hashables.representative
    }

    pub fn data(&self) -> &[u8] {
        &self.hashables.data
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.hashables.data = data;
    }

    pub fn pov_height(&self) -> u64 {
        self.hashables.pov_height
    }

    pub fn timestamp(&self) -> u64 {
        self.hashables.timestamp
    }

    pub fn work(&self) -> u64 {
        self.work
    }

    pub fn set_work(&mut self, work: u64) {
        self.work = work;
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = signature;
    }

    pub fn is_open(&self) -> bool {
        self.hashables.previous.is_zero()
    }

    /// Proof of work is computed over the previous block, or the account for the first block
    pub fn root(&self) -> Root {
        if self.is_open() {
            self.hashables.address.into()
        } else {
            self.hashables.previous.into()
        }
    }

    pub fn total_balance(&self) -> Option<Amount> {
        self.benefit().map(|b| b.total)
    }

    /// None if balance and the four benefit components overflow
    pub fn benefit(&self) -> Option<Benefit> {
        Benefit::new(
            self.hashables.balance,
            self.hashables.vote,
            self.hashables.network,
            self.hashables.storage,
            self.hashables.oracle,
        )
    }

    /// True if vote, network, storage and oracle are identical
    pub fn same_benefit_components(&self, other: &StateBlock) -> bool {
        self.vote() == other.vote()
            && self.network() == other.network()
            && self.storage() == other.storage()
            && self.oracle() == other.oracle()
    }

    pub fn has_zero_benefit_components(&self) -> bool {
        self.vote().is_zero()
            && self.network().is_zero()
            && self.storage().is_zero()
            && self.oracle().is_zero()
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn new_test_instance() -> Self {
        let key = KeyPair::from(42);
        Self::new(
            StateHashables {
                block_type: BlockType::Send,
                token: TokenId::from(1),
                address: key.account(),
                balance: Amount::raw(100),
                vote: Amount::zero(),
                network: Amount::zero(),
                storage: Amount::zero(),
                oracle: Amount::zero(),
                previous: BlockHash::from(2),
                link: Link::from(3),
                representative: Account::from(4),
                data: Vec::new(),
                pov_height: 0,
                timestamp: 1_600_000_000,
            },
            &key,
            69420,
        )
    }
}

impl Serialize for StateBlock {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        let h = &self.hashables;
        writer.write_u8_safe(h.block_type as u8);
        h.token.serialize(writer);
        h.address.serialize(writer);
        h.balance.serialize(writer);
        h.vote.serialize(writer);
        h.network.serialize(writer);
        h.storage.serialize(writer);
        h.oracle.serialize(writer);
        h.previous.serialize(writer);
        h.link.serialize(writer);
        h.representative.serialize(writer);
        write_var_bytes(writer, &h.data);
        writer.write_u64_be_safe(h.pov_height);
        writer.write_u64_be_safe(h.timestamp);
        writer.write_u64_be_safe(self.work);
        self.signature.serialize(writer);
    }
}

impl Deserialize for StateBlock {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        let hashables = StateHashables {
            block_type: BlockType::from_u8(stream.read_u8()?)?,
            token: TokenId::deserialize(stream)?,
            address: Account::deserialize(stream)?,
            balance: Amount::deserialize(stream)?,
            vote: Amount::deserialize(stream)?,
            network: Amount::deserialize(stream)?,
            storage: Amount::deserialize(stream)?,
            oracle: Amount::deserialize(stream)?,
            previous: BlockHash::deserialize(stream)?,
            link: Link::deserialize(stream)?,
            representative: Account::deserialize(stream)?,
            data: read_var_bytes(stream)?,
            pov_height: stream.read_u64_be()?,
            timestamp: stream.read_u64_be()?,
        };
        let work = stream.read_u64_be()?;
        let signature = Signature::deserialize(stream)?;
        Ok(Self {
            hashables,
            work,
            signature,
        })
    }
}
