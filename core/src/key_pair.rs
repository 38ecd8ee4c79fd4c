use super::{PublicKey, Signature};
use crate::{Account, StateBlock};
use anyhow::Context;
use rand::RngCore;

pub struct KeyPair {
    keypair: ed25519_dalek_blake2b::Keypair,
}

impl Default for KeyPair {
    fn default() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_priv_key_bytes(&bytes).unwrap()
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_priv_key_bytes(self.keypair.secret.as_bytes()).unwrap()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("account", &self.account())
            .finish()
    }
}

impl KeyPair {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_priv_key_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let secret = ed25519_dalek_blake2b::SecretKey::from_bytes(bytes)
            .map_err(|_| anyhow!("could not load secret key"))?;
        let public = ed25519_dalek_blake2b::PublicKey::from(&secret);
        Ok(Self {
            keypair: ed25519_dalek_blake2b::Keypair { secret, public },
        })
    }

    pub fn from_priv_key_hex(s: impl AsRef<str>) -> anyhow::Result<Self> {
        let input = s.as_ref();
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(input, &mut bytes)
            .with_context(|| format!("input string: '{}'", input))?;
        Self::from_priv_key_bytes(&bytes)
    }

    pub fn account(&self) -> Account {
        Account::from_bytes(self.keypair.public.to_bytes())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.keypair.public.to_bytes())
    }

    pub fn sign(&self, data: &[u8]) -> Signature {
        let expanded = ed25519_dalek_blake2b::ExpandedSecretKey::from(&self.keypair.secret);
        let signature = expanded.sign(data, &self.keypair.public);
        Signature::from_bytes(signature.to_bytes())
    }
}

impl From<u64> for KeyPair {
    fn from(value: u64) -> Self {
        let mut bytes = [0; 32];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        Self::from_priv_key_bytes(&bytes).unwrap()
    }
}

pub fn sign_message(key: &KeyPair, message: &[u8]) -> Signature {
    key.sign(message)
}

pub fn validate_message(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> anyhow::Result<()> {
    let public = ed25519_dalek_blake2b::PublicKey::from_bytes(public_key.as_bytes())
        .map_err(|_| anyhow!("could not extract public key"))?;
    let sig = ed25519_dalek_blake2b::Signature::from_bytes(signature.as_bytes())
        .map_err(|_| anyhow!("invalid signature bytes"))?;
    public
        .verify_strict(message, &sig)
        .map_err(|_| anyhow!("could not verify message"))?;
    Ok(())
}

/// The account of a block is its public key; the signed message is the block hash
pub fn validate_block_signature(block: &StateBlock) -> anyhow::Result<()> {
    validate_message(
        &block.address().into(),
        block.hash().as_bytes(),
        block.signature(),
    )
}
