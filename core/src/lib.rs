#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate num_derive;

mod account_meta;
mod amount;
mod benefit;
mod block_hash;
mod blocks;
mod frontier;
mod key_pair;
mod pending_key;
mod signature;
mod u256_struct;
mod unchecked_info;
pub mod utils;
pub mod work;

pub use account_meta::{AccountMeta, TokenMeta};
pub use amount::Amount;
pub use benefit::Benefit;
pub use block_hash::{hash_data, BlockHashBuilder};
pub use blocks::*;
pub use frontier::Frontier;
pub use key_pair::{sign_message, validate_block_signature, validate_message, KeyPair};
pub use pending_key::{PendingInfo, PendingKey};
pub use signature::Signature;
pub use unchecked_info::{SynchronizedKind, UncheckedInfo, UncheckedKind};

u256_struct!(Account);
u256_struct!(BlockHash);
u256_struct!(Link);
u256_struct!(PublicKey);
u256_struct!(Root);
u256_struct!(TokenId);

pub fn write_hex_bytes(bytes: &[u8], f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
    for &byte in bytes {
        write!(f, "{:02X}", byte)?;
    }
    Ok(())
}

impl From<Account> for Link {
    fn from(account: Account) -> Self {
        Link::from_bytes(*account.as_bytes())
    }
}

impl From<&Account> for Link {
    fn from(account: &Account) -> Self {
        Link::from_bytes(*account.as_bytes())
    }
}

impl From<BlockHash> for Link {
    fn from(hash: BlockHash) -> Self {
        Link::from_bytes(*hash.as_bytes())
    }
}

impl From<Link> for Account {
    fn from(link: Link) -> Self {
        Account::from_bytes(*link.as_bytes())
    }
}

impl From<Link> for BlockHash {
    fn from(link: Link) -> Self {
        BlockHash::from_bytes(*link.as_bytes())
    }
}

impl From<Account> for PublicKey {
    fn from(account: Account) -> Self {
        PublicKey::from_bytes(*account.as_bytes())
    }
}

impl From<PublicKey> for Account {
    fn from(key: PublicKey) -> Self {
        Account::from_bytes(*key.as_bytes())
    }
}

impl From<Account> for Root {
    fn from(account: Account) -> Self {
        Root::from_bytes(*account.as_bytes())
    }
}

impl From<BlockHash> for Root {
    fn from(hash: BlockHash) -> Self {
        Root::from_bytes(*hash.as_bytes())
    }
}

/// Token ids are the hash of the token's definition; the chain token is one of them
impl From<BlockHash> for TokenId {
    fn from(hash: BlockHash) -> Self {
        TokenId::from_bytes(*hash.as_bytes())
    }
}
