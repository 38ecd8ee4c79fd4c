use crate::utils::{BufferWriter, Deserialize, FixedSizeSerialize, Serialize, Stream};
use std::{
    fmt::Display,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// A token balance in raw units
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    raw: u128,
}

impl Amount {
    pub const MAX: Amount = Amount::raw(u128::MAX);

    pub const fn raw(value: u128) -> Self {
        Self { raw: value }
    }

    pub const fn zero() -> Self {
        Self { raw: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    pub fn number(&self) -> u128 {
        self.raw
    }

    pub fn to_be_bytes(self) -> [u8; 16] {
        self.raw.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self::raw(u128::from_be_bytes(bytes))
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.raw.checked_add(other.raw).map(Amount::raw)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.raw.checked_sub(other.raw).map(Amount::raw)
    }

    pub fn decode_dec(s: impl AsRef<str>) -> anyhow::Result<Self> {
        Ok(Self::raw(s.as_ref().parse::<u128>()?))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount::raw(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::raw(self.raw + rhs.raw)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::raw(self.raw - rhs.raw)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl std::fmt::Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Amount {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        writer.write_bytes_safe(&self.raw.to_be_bytes());
    }
}

impl FixedSizeSerialize for Amount {
    fn serialized_size() -> usize {
        std::mem::size_of::<u128>()
    }
}

impl Deserialize for Amount {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self> {
        let mut buffer = [0u8; 16];
        stream.read_bytes(&mut buffer, 16)?;
        Ok(Amount::from_be_bytes(buffer))
    }
}

impl serde::Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <String as serde::Deserialize>::deserialize(deserializer)?;
        Amount::decode_dec(value).map_err(serde::de::Error::custom)
    }
}
