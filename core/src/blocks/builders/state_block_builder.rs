use crate::{
    work::WorkThresholds, Account, Amount, BlockHash, BlockType, KeyPair, Link, Signature,
    StateBlock, StateHashables, TokenId,
};

pub struct StateBlockBuilder {
    block_type: BlockType,
    token: TokenId,
    address: Option<Account>,
    balance: Amount,
    vote: Amount,
    network: Amount,
    storage: Amount,
    oracle: Amount,
    previous: BlockHash,
    link: Link,
    representative: Account,
    data: Vec<u8>,
    pov_height: u64,
    timestamp: u64,
    key: KeyPair,
    work: Option<u64>,
    signature: Option<Signature>,
    previous_balance: Option<Amount>,
}

impl StateBlockBuilder {
    pub fn new() -> Self {
        Self {
            block_type: BlockType::Send,
            token: TokenId::from(1),
            address: None,
            balance: Amount::raw(4),
            vote: Amount::zero(),
            network: Amount::zero(),
            storage: Amount::zero(),
            oracle: Amount::zero(),
            previous: BlockHash::from(2),
            link: Link::from(5),
            representative: Account::from(3),
            data: Vec::new(),
            pov_height: 0,
            timestamp: 1_600_000_000,
            key: KeyPair::new(),
            work: None,
            signature: None,
            previous_balance: None,
        }
    }

    /// Copies all fields of an existing block, including work and signature
    pub fn from(mut self, other: &StateBlock) -> Self {
        let h = other.hashables();
        self.block_type = h.block_type;
        self.token = h.token;
        self.address = Some(h.address);
        self.balance = h.balance;
        self.vote = h.vote;
        self.network = h.network;
        self.storage = h.storage;
        self.oracle = h.oracle;
        self.previous = h.previous;
        self.link = h.link;
        self.representative = h.representative;
        self.data = h.data.clone();
        self.pov_height = h.pov_height;
        self.timestamp = h.timestamp;
        self.work = Some(other.work());
        self.signature = Some(other.signature().clone());
        self
    }

    pub fn block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = block_type;
        self
    }

    pub fn token(mut self, token: impl Into<TokenId>) -> Self {
        self.token = token.into();
        self
    }

    pub fn address(mut self, address: impl Into<Account>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn balance(mut self, balance: impl Into<Amount>) -> Self {
        self.balance = balance.into();
        self
    }

    pub fn previous_balance(mut self, balance: impl Into<Amount>) -> Self {
        self.previous_balance = Some(balance.into());
        self
    }

    pub fn amount_sent(self, amount: impl Into<Amount>) -> Self {
        let previous_balance = self
            .previous_balance
            .expect("previous balance not specified");
        self.balance(previous_balance - amount.into())
    }

    pub fn amount_received(self, amount: impl Into<Amount>) -> Self {
        let previous_balance = self
            .previous_balance
            .expect("previous balance not specified");
        self.balance(previous_balance + amount.into())
    }

    pub fn vote(mut self, vote: impl Into<Amount>) -> Self {
        self.vote = vote.into();
        self
    }

    pub fn network(mut self, network: impl Into<Amount>) -> Self {
        self.network = network.into();
        self
    }

    pub fn storage(mut self, storage: impl Into<Amount>) -> Self {
        self.storage = storage.into();
        self
    }

    pub fn oracle(mut self, oracle: impl Into<Amount>) -> Self {
        self.oracle = oracle.into();
        self
    }

    pub fn previous(mut self, previous: impl Into<BlockHash>) -> Self {
        self.previous = previous.into();
        self
    }

    pub fn link(mut self, link: impl Into<Link>) -> Self {
        self.link = link.into();
        self
    }

    pub fn representative(mut self, representative: impl Into<Account>) -> Self {
        self.representative = representative.into();
        self
    }

    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn pov_height(mut self, height: u64) -> Self {
        self.pov_height = height;
        self
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn key(mut self, key: &KeyPair) -> Self {
        self.signature = None;
        self.key = key.clone();
        self
    }

    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn sign_zero(self) -> Self {
        self.signature(Signature::new())
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = Some(work);
        self
    }

    pub fn build(self) -> StateBlock {
        let address = self.address.unwrap_or_else(|| self.key.account());
        let hashables = StateHashables {
            block_type: self.block_type,
            token: self.token,
            address,
            balance: self.balance,
            vote: self.vote,
            network: self.network,
            storage: self.storage,
            oracle: self.oracle,
            previous: self.previous,
            link: self.link,
            representative: self.representative,
            data: self.data,
            pov_height: self.pov_height,
            timestamp: self.timestamp,
        };
        let mut block = StateBlock::new(hashables, &self.key, 0);
        let work = self.work.unwrap_or_else(|| {
            WorkThresholds::publish_dev()
                .generate(&block.root())
                .unwrap_or_default()
        });
        block.set_work(work);
        if let Some(signature) = self.signature {
            block.set_signature(signature);
        }
        block
    }
}

impl Default for StateBlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
