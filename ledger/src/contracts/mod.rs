//! Boundary to the contract executor. Contracts are plugged in through the
//! [`ContractRegistry`]; the ledger only sees their capabilities.

mod capability;
mod registry;
mod vm_context;

pub use capability::{
    ContractCapability, ContractMethod, ContractReward, LegacySendContract,
    SimulatedReceiveContract, SimulatedSendContract,
};
pub use registry::{ContractRegistry, SELECTOR_LEN};
pub use vm_context::{StorageDelta, StorageNotFound, VmContext};
