use super::VmContext;
use rsdag_core::{Account, Amount, PendingInfo, PendingKey, StateBlock, TokenId};
use std::sync::Arc;

/// A block the contract wants the receiver to create
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractReward {
    pub block: StateBlock,
    pub token: TokenId,
    pub amount: Amount,
    pub to_address: Account,
}

/// Send side of contracts that do not touch contract storage
pub trait LegacySendContract: Send + Sync {
    /// May rewrite the payload of `block`
    fn do_send(&self, ctx: &mut VmContext, block: &mut StateBlock) -> anyhow::Result<()>;

    fn do_pending(&self, block: &StateBlock) -> anyhow::Result<Option<(PendingKey, PendingInfo)>>;
}

pub trait SimulatedSendContract: Send + Sync {
    /// Runs the send against `ctx` and returns the pending entry it creates, if any
    fn process_send(
        &self,
        ctx: &mut VmContext,
        block: &mut StateBlock,
    ) -> anyhow::Result<Option<(PendingKey, PendingInfo)>>;

    /// PoV height the block waits for, 0 if it can be processed now
    fn do_gap_pov(&self, ctx: &VmContext, block: &StateBlock) -> anyhow::Result<u64>;
}

pub trait SimulatedReceiveContract: Send + Sync {
    fn do_receive(
        &self,
        ctx: &mut VmContext,
        block: &mut StateBlock,
        input: &StateBlock,
    ) -> anyhow::Result<Vec<ContractReward>>;
}

#[derive(Clone)]
pub enum ContractCapability {
    LegacySend(Arc<dyn LegacySendContract>),
    SimulatedSend(Arc<dyn SimulatedSendContract>),
    SimulatedReceive(Arc<dyn SimulatedReceiveContract>),
}

impl ContractCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractCapability::LegacySend(_) => "legacy_send",
            ContractCapability::SimulatedSend(_) => "simulated_send",
            ContractCapability::SimulatedReceive(_) => "simulated_receive",
        }
    }
}

/// One method of a chain contract, selected by the first four bytes of the payload.
/// A method has at most one send side and at most one receive side.
#[derive(Clone)]
pub struct ContractMethod {
    pub name: String,
    capabilities: Vec<ContractCapability>,
}

impl ContractMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn legacy_send(self, contract: Arc<dyn LegacySendContract>) -> Self {
        self.with(ContractCapability::LegacySend(contract))
    }

    pub fn simulated_send(self, contract: Arc<dyn SimulatedSendContract>) -> Self {
        self.with(ContractCapability::SimulatedSend(contract))
    }

    pub fn simulated_receive(self, contract: Arc<dyn SimulatedReceiveContract>) -> Self {
        self.with(ContractCapability::SimulatedReceive(contract))
    }

    fn with(mut self, capability: ContractCapability) -> Self {
        let is_send = |c: &ContractCapability| !matches!(c, ContractCapability::SimulatedReceive(_));
        let new_is_send = is_send(&capability);
        self.capabilities.retain(|c| is_send(c) != new_is_send);
        self.capabilities.push(capability);
        self
    }

    pub fn capabilities(&self) -> &[ContractCapability] {
        &self.capabilities
    }

    pub fn send_side(&self) -> Option<&ContractCapability> {
        self.capabilities
            .iter()
            .find(|c| !matches!(c, ContractCapability::SimulatedReceive(_)))
    }

    pub fn receive_side(&self) -> Option<&Arc<dyn SimulatedReceiveContract>> {
        self.capabilities.iter().find_map(|c| match c {
            ContractCapability::SimulatedReceive(contract) => Some(contract),
            _ => None,
        })
    }
}
