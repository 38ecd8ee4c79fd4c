use super::ContractMethod;
use rsdag_core::Account;
use std::{collections::HashMap, sync::Arc};

pub const SELECTOR_LEN: usize = 4;

/// Chain contracts by address, their methods by payload selector
#[derive(Default, Clone)]
pub struct ContractRegistry {
    contracts: HashMap<Account, HashMap<[u8; SELECTOR_LEN], Arc<ContractMethod>>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(
        &mut self,
        address: Account,
        selector: [u8; SELECTOR_LEN],
        method: ContractMethod,
    ) -> &mut Self {
        self.contracts
            .entry(address)
            .or_default()
            .insert(selector, Arc::new(method));
        self
    }

    pub fn is_chain_contract(&self, address: &Account) -> bool {
        self.contracts.contains_key(address)
    }

    /// Looks up the method that handles `payload`
    pub fn resolve(&self, address: &Account, payload: &[u8]) -> anyhow::Result<Arc<ContractMethod>> {
        let methods = self
            .contracts
            .get(address)
            .ok_or_else(|| anyhow!("can not find chain contract {}", address))?;
        let selector: [u8; SELECTOR_LEN] = payload
            .get(..SELECTOR_LEN)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| anyhow!("payload too short for contract {}", address))?;
        methods.get(&selector).cloned().ok_or_else(|| {
            anyhow!(
                "contract {} has no method {:02x?}",
                address,
                selector
            )
        })
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
