use crate::{Ledger, DEV_GENESIS_KEY};
use rsdag_core::{
    Account, Amount, BlockBuilder, BlockHash, BlockType, KeyPair, Link, StateBlock, StateBlockBuilder,
    TokenMeta,
};
use rsdag_store_lmdb::Transaction;

/// Test helper that creates chain token blocks for a single account
pub(crate) struct AccountBlockFactory<'a> {
    pub key: KeyPair,
    ledger: &'a Ledger,
}

impl<'a> AccountBlockFactory<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self {
            key: KeyPair::new(),
            ledger,
        }
    }

    pub fn genesis(ledger: &'a Ledger) -> Self {
        Self {
            key: DEV_GENESIS_KEY.clone(),
            ledger,
        }
    }

    pub fn account(&self) -> Account {
        self.key.account()
    }

    pub fn info(&self, txn: &dyn Transaction) -> Option<TokenMeta> {
        self.ledger
            .token_meta(txn, &self.account(), &self.ledger.constants.chain_token)
            .unwrap()
    }

    fn base(&self, block_type: BlockType) -> StateBlockBuilder {
        BlockBuilder::state()
            .block_type(block_type)
            .token(self.ledger.constants.chain_token)
            .address(self.account())
            .key(&self.key)
    }

    /// Continues the chain of the account
    fn next(&self, txn: &dyn Transaction, block_type: BlockType) -> StateBlockBuilder {
        let info = self.info(txn).unwrap();
        self.base(block_type)
            .previous(info.header)
            .previous_balance(info.balance)
            .balance(info.balance)
            .representative(info.representative)
    }

    pub fn send(&self, txn: &dyn Transaction) -> StateBlockBuilder {
        self.next(txn, BlockType::Send)
            .amount_sent(Amount::raw(50))
            .link(Account::from(1))
    }

    pub fn send_to(
        &self,
        txn: &dyn Transaction,
        destination: Account,
        amount: Amount,
    ) -> StateBlockBuilder {
        self.next(txn, BlockType::Send)
            .amount_sent(amount)
            .link(destination)
    }

    /// Sends on top of a block that has not been processed yet
    pub fn send_after(
        &self,
        previous: &StateBlock,
        destination: Account,
        amount: Amount,
    ) -> StateBlockBuilder {
        self.base(BlockType::Send)
            .previous(previous.hash())
            .previous_balance(previous.balance())
            .balance(previous.balance())
            .representative(previous.representative())
            .amount_sent(amount)
            .link(destination)
    }

    pub fn receive(&self, txn: &dyn Transaction, send_hash: BlockHash) -> StateBlockBuilder {
        let amount = self.amount_of(txn, &send_hash);
        self.receive_with_amount(txn, send_hash, amount)
    }

    pub fn receive_with_amount(
        &self,
        txn: &dyn Transaction,
        send_hash: BlockHash,
        amount: Amount,
    ) -> StateBlockBuilder {
        self.next(txn, BlockType::Receive)
            .amount_received(amount)
            .link(send_hash)
    }

    pub fn open(&self, txn: &dyn Transaction, send_hash: BlockHash) -> StateBlockBuilder {
        let amount = self.amount_of(txn, &send_hash);
        self.open_with_amount(send_hash, amount)
    }

    /// Opens the chain without looking at the send block, which may not be in the ledger yet
    pub fn open_with_amount(&self, send_hash: BlockHash, amount: Amount) -> StateBlockBuilder {
        self.base(BlockType::Open)
            .previous(BlockHash::zero())
            .representative(self.account())
            .balance(amount)
            .link(send_hash)
    }

    pub fn change(&self, txn: &dyn Transaction) -> StateBlockBuilder {
        self.next(txn, BlockType::Change)
            .representative(Account::from(1))
            .link(Link::zero())
    }

    pub fn contract_send(
        &self,
        txn: &dyn Transaction,
        contract: Account,
        amount: Amount,
        data: Vec<u8>,
    ) -> StateBlockBuilder {
        self.next(txn, BlockType::ContractSend)
            .amount_sent(amount)
            .link(contract)
            .data(data)
    }

    /// Claims back what a contract send to a deposit contract sent
    pub fn contract_reward(&self, txn: &dyn Transaction, send_hash: BlockHash) -> StateBlockBuilder {
        let send = self.ledger.get_block(txn, &send_hash).unwrap().unwrap();
        let amount = self.amount_of(txn, &send_hash);
        self.next(txn, BlockType::ContractReward)
            .amount_received(amount)
            .link(send_hash)
            .data(send.data().to_vec())
    }

    fn amount_of(&self, txn: &dyn Transaction, hash: &BlockHash) -> Amount {
        let block = self.ledger.get_block(txn, hash).unwrap().unwrap();
        self.ledger.calculate_amount(txn, &block).unwrap()
    }
}
