use crate::{
    utils::{BufferWriter, Deserialize, FixedSizeSerialize, Serialize, Stream},
    Account, Amount, Benefit, BlockHash, TokenId,
};

/// Per token chain state of an account
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenMeta {
    #[serde(rename = "type")]
    pub token: TokenId,
    pub header: BlockHash,
    pub representative: Account,
    pub open_block: BlockHash,
    pub balance: Amount,
    pub block_count: u64,
    pub belong_to: Account,
    pub modified: u64,
}

impl TokenMeta {
    pub fn new_test_instance() -> Self {
        Self {
            token: TokenId::from(1),
            header: BlockHash::from(2),
            representative: Account::from(3),
            open_block: BlockHash::from(4),
            balance: Amount::raw(5),
            block_count: 6,
            belong_to: Account::from(7),
            modified: 8,
        }
    }
}

impl Serialize for TokenMeta {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.token.serialize(writer);
        self.header.serialize(writer);
        self.representative.serialize(writer);
        self.open_block.serialize(writer);
        self.balance.serialize(writer);
        writer.write_u64_be_safe(self.block_count);
        self.belong_to.serialize(writer);
        writer.write_u64_be_safe(self.modified);
    }
}

impl FixedSizeSerialize for TokenMeta {
    fn serialized_size() -> usize {
        TokenId::serialized_size()
            + BlockHash::serialized_size()
            + Account::serialized_size()
            + BlockHash::serialized_size()
            + Amount::serialized_size()
            + 8
            + Account::serialized_size()
            + 8
    }
}

impl Deserialize for TokenMeta {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        Ok(Self {
            token: TokenId::deserialize(stream)?,
            header: BlockHash::deserialize(stream)?,
            representative: Account::deserialize(stream)?,
            open_block: BlockHash::deserialize(stream)?,
            balance: Amount::deserialize(stream)?,
            block_count: stream.read_u64_be()?,
            belong_to: Account::deserialize(stream)?,
            modified: stream.read_u64_be()?,
        })
    }
}

/// All token chains of one account plus the chain token benefit components
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccountMeta {
    #[serde(rename = "account")]
    pub address: Account,
    pub coin_balance: Amount,
    pub coin_vote: Amount,
    pub coin_network: Amount,
    pub coin_storage: Amount,
    pub coin_oracle: Amount,
    pub tokens: Vec<TokenMeta>,
}

impl AccountMeta {
    pub fn new(address: Account) -> Self {
        Self {
            address,
            coin_balance: Amount::zero(),
            coin_vote: Amount::zero(),
            coin_network: Amount::zero(),
            coin_storage: Amount::zero(),
            coin_oracle: Amount::zero(),
            tokens: Vec::new(),
        }
    }

    pub fn token(&self, token: &TokenId) -> Option<&TokenMeta> {
        self.tokens.iter().find(|tm| tm.token == *token)
    }

    /// Replaces the entry for the same token or appends a new one
    pub fn upsert_token(&mut self, token_meta: TokenMeta) {
        match self.tokens.iter_mut().find(|tm| tm.token == token_meta.token) {
            Some(existing) => *existing = token_meta,
            None => self.tokens.push(token_meta),
        }
    }

    pub fn remove_token(&mut self, token: &TokenId) -> Option<TokenMeta> {
        let index = self.tokens.iter().position(|tm| tm.token == *token)?;
        Some(self.tokens.remove(index))
    }

    /// None if the chain token components overflow
    pub fn coin_benefit(&self) -> Option<Benefit> {
        Benefit::new(
            self.coin_balance,
            self.coin_vote,
            self.coin_network,
            self.coin_storage,
            self.coin_oracle,
        )
    }

    pub fn total_balance(&self) -> Option<Amount> {
        self.coin_benefit().map(|b| b.total)
    }

    pub fn new_test_instance() -> Self {
        Self {
            address: Account::from(1),
            coin_balance: Amount::raw(10),
            coin_vote: Amount::raw(1),
            coin_network: Amount::raw(2),
            coin_storage: Amount::raw(3),
            coin_oracle: Amount::raw(4),
            tokens: vec![TokenMeta::new_test_instance()],
        }
    }
}

impl Serialize for AccountMeta {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.address.serialize(writer);
        self.coin_balance.serialize(writer);
        self.coin_vote.serialize(writer);
        self.coin_network.serialize(writer);
        self.coin_storage.serialize(writer);
        self.coin_oracle.serialize(writer);
        writer.write_u32_be_safe(self.tokens.len() as u32);
        for token in &self.tokens {
            token.serialize(writer);
        }
    }
}

impl Deserialize for AccountMeta {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        let mut result = Self {
            address: Account::deserialize(stream)?,
            coin_balance: Amount::deserialize(stream)?,
            coin_vote: Amount::deserialize(stream)?,
            coin_network: Amount::deserialize(stream)?,
            coin_storage: Amount::deserialize(stream)?,
            coin_oracle: Amount::deserialize(stream)?,
            tokens: Vec::new(),
        };
        let count = stream.read_u32_be()? as usize;
        if count * TokenMeta::serialized_size() > stream.in_avail() {
            bail!("token count {} exceeds stream", count);
        }
        result.tokens.reserve(count);
        for _ in 0..count {
            result.tokens.push(TokenMeta::deserialize(stream)?);
        }
        Ok(result)
    }
}
