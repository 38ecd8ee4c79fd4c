use crate::{
    utils::{BufferWriter, Deserialize, FixedSizeSerialize, Serialize, Stream},
    Amount,
};

/// Delegated weight of one account, or the aggregate of all accounts
/// delegating to a representative
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Benefit {
    pub balance: Amount,
    pub vote: Amount,
    pub network: Amount,
    pub storage: Amount,
    pub oracle: Amount,
    pub total: Amount,
}

impl Benefit {
    pub const fn zero() -> Self {
        Self {
            balance: Amount::zero(),
            vote: Amount::zero(),
            network: Amount::zero(),
            storage: Amount::zero(),
            oracle: Amount::zero(),
            total: Amount::zero(),
        }
    }

    /// `total` is derived from the five components. None if the sum
    /// does not fit into an amount.
    pub fn new(
        balance: Amount,
        vote: Amount,
        network: Amount,
        storage: Amount,
        oracle: Amount,
    ) -> Option<Self> {
        let total = balance
            .checked_add(vote)?
            .checked_add(network)?
            .checked_add(storage)?
            .checked_add(oracle)?;
        Some(Self {
            balance,
            vote,
            network,
            storage,
            oracle,
            total,
        })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub fn checked_add(&self, other: &Benefit) -> Option<Benefit> {
        Some(Self {
            balance: self.balance.checked_add(other.balance)?,
            vote: self.vote.checked_add(other.vote)?,
            network: self.network.checked_add(other.network)?,
            storage: self.storage.checked_add(other.storage)?,
            oracle: self.oracle.checked_add(other.oracle)?,
            total: self.total.checked_add(other.total)?,
        })
    }

    pub fn checked_sub(&self, other: &Benefit) -> Option<Benefit> {
        Some(Self {
            balance: self.balance.checked_sub(other.balance)?,
            vote: self.vote.checked_sub(other.vote)?,
            network: self.network.checked_sub(other.network)?,
            storage: self.storage.checked_sub(other.storage)?,
            oracle: self.oracle.checked_sub(other.oracle)?,
            total: self.total.checked_sub(other.total)?,
        })
    }

    pub fn new_test_instance() -> Self {
        Self {
            balance: Amount::raw(1000),
            vote: Amount::raw(1),
            network: Amount::raw(2),
            storage: Amount::raw(3),
            oracle: Amount::raw(4),
            total: Amount::raw(1010),
        }
    }
}

impl Serialize for Benefit {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.balance.serialize(writer);
        self.vote.serialize(writer);
        self.network.serialize(writer);
        self.storage.serialize(writer);
        self.oracle.serialize(writer);
        self.total.serialize(writer);
    }
}

impl FixedSizeSerialize for Benefit {
    fn serialized_size() -> usize {
        Amount::serialized_size() * 6
    }
}

impl Deserialize for Benefit {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        Ok(Self {
            balance: Amount::deserialize(stream)?,
            vote: Amount::deserialize(stream)?,
            network: Amount::deserialize(stream)?,
            storage: Amount::deserialize(stream)?,
            oracle: Amount::deserialize(stream)?,
            total: Amount::deserialize(stream)?,
        })
    }
}
