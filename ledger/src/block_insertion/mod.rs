mod block_inserter;
mod validation;

pub(crate) use block_inserter::BlockInserter;
pub(crate) use validation::{BlockValidator, ValidationError};
