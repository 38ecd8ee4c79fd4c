use once_cell::sync::Lazy;
use rsdag_core::{
    hash_data,
    utils::get_env_or_default_string,
    work::{WorkThresholds, WORK_THRESHOLDS_STUB},
    Account, Amount, BlockHash, BlockType, KeyPair, Link, StateBlock, StateHashables, TokenId,
};

/// Creates tokens and is the source of the genesis balance
pub static MINTAGE_ADDRESS: Lazy<Account> = Lazy::new(|| system_address("mintage"));

pub static CHAIN_TOKEN: Lazy<TokenId> = Lazy::new(|| {
    TokenId::from(hash_data(get_env_or_default_string(
        "RSDAG_CHAIN_TOKEN_NAME",
        "rsdag",
    )))
});

pub static DEV_GENESIS_KEY: Lazy<KeyPair> = Lazy::new(|| KeyPair::from(0x6765_6e65_7369_73));

pub static LEDGER_CONSTANTS_STUB: Lazy<LedgerConstants> =
    Lazy::new(|| LedgerConstants::new(WORK_THRESHOLDS_STUB.clone(), DEV_GENESIS_KEY.account()));

pub static DEV_GENESIS_ACCOUNT: Lazy<Account> = Lazy::new(|| DEV_GENESIS_KEY.account());
pub static DEV_GENESIS_HASH: Lazy<BlockHash> =
    Lazy::new(|| LEDGER_CONSTANTS_STUB.genesis_block.hash());

const GENESIS_SUPPLY: Amount = Amount::raw(60_000_000_000_000_000);
const GENESIS_TIMESTAMP: u64 = 1_553_990_401;

/// Address of a system contract, derived from its name
pub fn system_address(name: &str) -> Account {
    Account::from_bytes(*hash_data(name).as_bytes())
}

#[derive(Clone)]
pub struct LedgerConstants {
    pub work: WorkThresholds,
    pub chain_token: TokenId,
    pub genesis_account: Account,
    pub genesis_amount: Amount,
    /// Contract send of the mintage contract that funds the genesis account
    pub genesis_mintage: StateBlock,
    /// Contract reward that opens the genesis account
    pub genesis_block: StateBlock,
    pub mintage_address: Account,
    /// Contract sends to these addresses are not signed
    pub no_sign_addresses: Vec<Account>,
    /// Contracts that may have to wait for a PoV height
    pub reward_contract_addresses: Vec<Account>,
}

impl LedgerConstants {
    pub fn new(work: WorkThresholds, genesis_account: Account) -> Self {
        let chain_token = *CHAIN_TOKEN;
        let mintage_address = *MINTAGE_ADDRESS;
        let genesis_mintage = genesis_mintage_block(chain_token, mintage_address, genesis_account);
        let genesis_block =
            genesis_open_block(chain_token, genesis_account, genesis_mintage.hash());
        Self {
            work,
            chain_token,
            genesis_account,
            genesis_amount: GENESIS_SUPPLY,
            genesis_mintage,
            genesis_block,
            mintage_address,
            no_sign_addresses: Vec::new(),
            reward_contract_addresses: Vec::new(),
        }
    }

    pub fn live() -> Self {
        let mut constants = Self::new(
            WorkThresholds::publish_full().clone(),
            system_address("genesis"),
        );
        constants.no_sign_addresses = vec![system_address("rewards"), system_address("miner")];
        constants.reward_contract_addresses = vec![system_address("miner")];
        constants
    }

    pub fn unit_test() -> Self {
        Self::new(
            WorkThresholds::publish_dev().clone(),
            DEV_GENESIS_KEY.account(),
        )
    }

    pub fn is_genesis_block(&self, block: &StateBlock) -> bool {
        let hash = block.hash();
        hash == self.genesis_mintage.hash() || hash == self.genesis_block.hash()
    }

    pub fn is_no_sign_address(&self, address: &Account) -> bool {
        self.no_sign_addresses.contains(address)
    }

    pub fn is_reward_contract_address(&self, address: &Account) -> bool {
        self.reward_contract_addresses.contains(address)
    }
}

fn genesis_mintage_block(
    chain_token: TokenId,
    mintage_address: Account,
    genesis_account: Account,
) -> StateBlock {
    StateBlock::new_unsigned(
        StateHashables {
            block_type: BlockType::ContractSend,
            token: chain_token,
            address: mintage_address,
            balance: Amount::zero(),
            vote: Amount::zero(),
            network: Amount::zero(),
            storage: Amount::zero(),
            oracle: Amount::zero(),
            previous: BlockHash::zero(),
            link: Link::from(mintage_address),
            representative: genesis_account,
            data: Vec::new(),
            pov_height: 0,
            timestamp: GENESIS_TIMESTAMP,
        },
        0,
    )
}

fn genesis_open_block(
    chain_token: TokenId,
    genesis_account: Account,
    mintage_hash: BlockHash,
) -> StateBlock {
    StateBlock::new_unsigned(
        StateHashables {
            block_type: BlockType::ContractReward,
            token: chain_token,
            address: genesis_account,
            balance: GENESIS_SUPPLY,
            vote: Amount::zero(),
            network: Amount::zero(),
            storage: Amount::zero(),
            oracle: Amount::zero(),
            previous: BlockHash::zero(),
            link: Link::from(mintage_hash),
            representative: genesis_account,
            data: Vec::new(),
            pov_height: 0,
            timestamp: GENESIS_TIMESTAMP,
        },
        0,
    )
}
