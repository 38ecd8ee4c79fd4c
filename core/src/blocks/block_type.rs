use num_traits::FromPrimitive;

#[repr(u8)]
#[derive(
    PartialEq, Eq, Debug, Clone, Copy, Hash, FromPrimitive, serde::Serialize, serde::Deserialize,
)]
pub enum BlockType {
    Send = 2,
    Receive = 3,
    Change = 4,
    Open = 5,
    ContractReward = 6,
    ContractSend = 7,
    /// Heartbeat of a representative; validated like a change block
    Online = 11,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Send => "Send",
            BlockType::Receive => "Receive",
            BlockType::Change => "Change",
            BlockType::Open => "Open",
            BlockType::ContractReward => "ContractReward",
            BlockType::ContractSend => "ContractSend",
            BlockType::Online => "Online",
        }
    }

    pub fn is_contract(&self) -> bool {
        matches!(self, BlockType::ContractSend | BlockType::ContractReward)
    }

    pub fn from_u8(value: u8) -> anyhow::Result<Self> {
        FromPrimitive::from_u8(value).ok_or_else(|| anyhow!("invalid block type {}", value))
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
