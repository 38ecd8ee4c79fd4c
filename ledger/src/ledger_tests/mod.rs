mod helpers;
mod ledger_invariants;
mod process_contract;
mod process_open;
mod unchecked_resolution;

pub(crate) use helpers::*;
