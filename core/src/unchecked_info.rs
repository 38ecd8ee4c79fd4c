use crate::{
    utils::{BufferWriter, Deserialize, Serialize, Stream},
    StateBlock,
};
use num_traits::FromPrimitive;

/// The dependency a parked block is waiting for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UncheckedKind {
    Previous,
    Link,
    TokenInfo,
    Publish,
}

impl UncheckedKind {
    /// Order in which the kinds are visited when walking all unchecked blocks
    pub const ALL: [UncheckedKind; 4] = [
        UncheckedKind::Previous,
        UncheckedKind::Link,
        UncheckedKind::TokenInfo,
        UncheckedKind::Publish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UncheckedKind::Previous => "previous",
            UncheckedKind::Link => "link",
            UncheckedKind::TokenInfo => "token_info",
            UncheckedKind::Publish => "publish",
        }
    }
}

/// Where a block came from
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum SynchronizedKind {
    Local = 0,
    Sync = 1,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UncheckedInfo {
    pub block: StateBlock,
    pub sync: SynchronizedKind,
}

impl UncheckedInfo {
    pub fn new(block: StateBlock, sync: SynchronizedKind) -> Self {
        Self { block, sync }
    }
}

impl Serialize for UncheckedInfo {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        self.block.serialize(writer);
        writer.write_u8_safe(self.sync as u8);
    }
}

impl Deserialize for UncheckedInfo {
    type Target = Self;

    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self::Target> {
        let block = StateBlock::deserialize(stream)?;
        let sync = stream.read_u8()?;
        let sync = SynchronizedKind::from_u8(sync)
            .ok_or_else(|| anyhow!("invalid synchronized kind {}", sync))?;
        Ok(Self { block, sync })
    }
}
