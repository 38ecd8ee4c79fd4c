/// Outcome of validating or processing a single block.
///
/// Everything except `Progress` is a rejection. `Gap*` results are recoverable: the block
/// is parked until the missing dependency shows up.
///
/// `BadHash`, `BadMerkleRoot`, `BadTarget`, `GapTransaction`, `InvalidTime` and `InvalidTxNum`
/// are never produced by this ledger; they stay so the other variants keep their wire ordinals.
#[derive(PartialEq, Eq, Debug, Clone, Copy, FromPrimitive)]
#[repr(u8)]
pub enum ProcessResult {
    Progress,         // Hasn't been seen before, signed correctly
    BadWork,          // Work is below the threshold for the block root
    BadSignature,     // Signature was bad, forged or transmission error
    BadHash,
    BadMerkleRoot,
    BadTarget,
    Old,              // Already seen and was valid
    Fork,             // Competing block for the same previous
    GapPrevious,      // Block marked as previous is unknown
    GapSource,        // Block marked as source is unknown
    GapSmartContract, // Link points to an unknown contract
    GapTransaction,
    GapPovHeight,   // Contract waits for a PoV height that was not seen yet
    GapTokenInfo,   // Contract storage the block depends on is missing
    BalanceMismatch, // Balance and amount delta don't match
    UnReceivable,    // No pending entry for the source block
    InvalidData,     // Contract payload differs from the simulated one
    InvalidTime,
    InvalidTxNum,
    Other,
}

impl ProcessResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessResult::Progress => "Progress",
            ProcessResult::BadWork => "BadWork",
            ProcessResult::BadSignature => "BadSignature",
            ProcessResult::BadHash => "BadHash",
            ProcessResult::BadMerkleRoot => "BadMerkleRoot",
            ProcessResult::BadTarget => "BadTarget",
            ProcessResult::Old => "Old",
            ProcessResult::Fork => "Fork",
            ProcessResult::GapPrevious => "GapPrevious",
            ProcessResult::GapSource => "GapSource",
            ProcessResult::GapSmartContract => "GapSmartContract",
            ProcessResult::GapTransaction => "GapTransaction",
            ProcessResult::GapPovHeight => "GapPovHeight",
            ProcessResult::GapTokenInfo => "GapTokenInfo",
            ProcessResult::BalanceMismatch => "BalanceMismatch",
            ProcessResult::UnReceivable => "UnReceivable",
            ProcessResult::InvalidData => "InvalidData",
            ProcessResult::InvalidTime => "InvalidTime",
            ProcessResult::InvalidTxNum => "InvalidTxNum",
            ProcessResult::Other => "Other",
        }
    }

    /// The block may become valid once a dependency arrives
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            ProcessResult::GapPrevious
                | ProcessResult::GapSource
                | ProcessResult::GapSmartContract
                | ProcessResult::GapTransaction
                | ProcessResult::GapPovHeight
                | ProcessResult::GapTokenInfo
        )
    }
}

impl std::fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
